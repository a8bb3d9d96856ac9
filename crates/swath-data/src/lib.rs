//! Distributed observation collections.
//!
//! A [`Data`] holds one process's share of a set of observations
//! distributed over the process groups of a [`Comm`](swath_comm::Comm),
//! plus a collection-wide [`Metadata`] mapping. [`Data::split`] and
//! [`Data::select`] produce views that reference the same records and
//! share the same metadata without copying either. Criteria based on
//! keyed values are verified to agree across every process of a group
//! before they are used.
//!
//! ```rust
//! use swath_comm::Comm;
//! use swath_core::Value;
//! use swath_data::{Data, Record, SplitBy, SplitKey};
//!
//! let mut data = Data::new(Comm::single());
//! for name in ["a", "b", "c"] {
//!     data.push(Record::new().with_name(name));
//! }
//! let views = data.split(&SplitBy::Index, false).unwrap();
//! assert_eq!(views.len(), 3);
//!
//! views[&SplitKey::Index(0)].meta().insert("band", "f150");
//! assert_eq!(views[&SplitKey::Index(2)].meta().get("band"), Some(Value::from("f150")));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod data;
pub mod error;
pub mod info;
pub mod metadata;
pub mod record;
pub mod select;
pub mod split;

pub use data::{Data, ObsRef};
pub use error::DataError;
pub use metadata::Metadata;
pub use record::Record;
pub use select::Selection;
pub use split::{SplitBy, SplitKey};
