//! Core types and traits for the swath data layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the interval, communicator and collection
//! crates: the dynamically-typed [`Value`] carried by observation keys
//! and collection metadata, observation identifiers, exact-or-pattern
//! matchers, floating-point tolerance comparison, and the
//! [`Observation`] capability trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod matcher;
pub mod observation;
pub mod tolerance;
pub mod value;

pub use id::ObsUid;
pub use matcher::{Matcher, ValueMatch};
pub use observation::Observation;
pub use tolerance::{isclose, ATOL, RTOL};
pub use value::Value;
