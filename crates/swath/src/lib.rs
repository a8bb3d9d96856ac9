//! Swath: in-memory observation data management for distributed
//! timestream pipelines.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all swath sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use swath::prelude::*;
//!
//! let ts = Timestamps::uniform(0.0, 1.0, 10).unwrap();
//! let valid = IntervalList::from_samplespans(ts.clone(), &[(0, 2), (5, 7)]).unwrap();
//! let turnaround = IntervalList::from_samplespans(ts.clone(), &[(1, 3), (6, 9)]).unwrap();
//! let science = (&valid & &(!&turnaround).unwrap()).unwrap();
//! assert_eq!(science.n_samples(), 2);
//!
//! let mut scan = Record::new()
//!     .with_name("scan_0")
//!     .with_uid(0u64)
//!     .with_detectors(["d0", "d1"])
//!     .with_timestamps(ts);
//! scan.insert("band", "f090");
//! scan.set_intervals("science", science).unwrap();
//!
//! let mut data = Data::new(Comm::single());
//! data.push(scan);
//! let f090 = data.select(&Selection::new().key("band").value("f090")).unwrap();
//! assert_eq!(f090.len(), 1);
//! assert!(f090.is_view());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `swath-core` | `Value`, `ObsUid`, matchers, the `Observation` trait |
//! | [`intervals`] | `swath-intervals` | `Timestamps`, `Interval`, `IntervalList` |
//! | [`comm`] | `swath-comm` | Communicator contract, process groups, local backend |
//! | [`data`] | `swath-data` | `Data` collections, metadata, split and select |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and the observation capability trait (`swath-core`).
pub use swath_core as types;

/// Sample-indexed interval algebra (`swath-intervals`).
///
/// [`intervals::IntervalList`] supports complement, intersection and
/// union over a shared [`intervals::Timestamps`] array.
pub use swath_intervals as intervals;

/// Process-group communication (`swath-comm`).
///
/// [`comm::Comm`] derives group and rank communicators from a world
/// [`comm::Communicator`]; [`comm::LocalWorld`] runs ranks on threads.
pub use swath_comm as comm;

/// Distributed observation collections (`swath-data`).
pub use swath_data as data;

/// Common imports for typical swath usage.
///
/// ```rust
/// use swath::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use swath_core::{Matcher, ObsUid, Observation, Value, ValueMatch};

    // Intervals
    pub use swath_intervals::{Interval, IntervalError, IntervalList, Timestamps};

    // Communication
    pub use swath_comm::{Comm, CommConfig, CommError, Communicator, LocalWorld, ReduceOp};

    // Collections
    pub use swath_data::{Data, DataError, Metadata, Record, Selection, SplitBy, SplitKey};
}
