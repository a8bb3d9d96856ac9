//! Process-group communication for the swath data layer.
//!
//! The collection layer coordinates cooperating processes only through
//! the [`Communicator`] contract: rank and size, blocking point-to-point
//! messages, and the collectives built on them (barrier, broadcast,
//! gather, all-gather, all-reduce). [`Comm`] arranges a world
//! communicator into equally sized process groups and derives the
//! group and rank communicators. A [`Comm`] without communicators
//! ([`Comm::single`]) represents a non-distributed process in which
//! every collective is an identity.
//!
//! [`LocalWorld`] is an in-process backend with one endpoint per rank,
//! connected by `crossbeam-channel` mailboxes. It runs distributed code
//! on threads, which is how the workspace tests multi-rank behavior.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod communicator;
pub mod config;
pub mod error;
pub mod local;
pub mod log;
pub mod sub;
pub mod topology;

pub use communicator::{Communicator, ReduceOp, Tag, MAX_USER_TAG};
pub use config::CommConfig;
pub use error::CommError;
pub use local::{LocalComm, LocalWorld};
pub use sub::SubComm;
pub use topology::Comm;
