//! Sample-indexed, timestamp-anchored interval algebra.
//!
//! An [`IntervalList`] marks subsets of the samples of one observation
//! (for example "valid science data" or "turnaround") as sorted,
//! non-overlapping spans. Each [`Interval`] is keyed twice: by an
//! inclusive sample range and by the matching continuous time range,
//! both resolved against a shared [`Timestamps`] array. Lists built on
//! the same timestamps can be combined with complement (`!`),
//! intersection (`&`) and union (`|`).
//!
//! ```rust
//! use swath_intervals::{IntervalList, Timestamps};
//!
//! let ts = Timestamps::new((0..10).map(f64::from).collect::<Vec<_>>()).unwrap();
//! let a = IntervalList::from_samplespans(ts.clone(), &[(0, 2), (5, 7)]).unwrap();
//! let b = IntervalList::from_samplespans(ts.clone(), &[(1, 3), (6, 9)]).unwrap();
//!
//! let both = (&a & &b).unwrap();
//! assert_eq!(both, IntervalList::from_samplespans(ts.clone(), &[(1, 2), (6, 7)]).unwrap());
//!
//! let gaps = (!&a).unwrap();
//! assert_eq!(gaps, IntervalList::from_samplespans(ts, &[(3, 4), (8, 9)]).unwrap());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interval;
pub mod list;
pub mod timestamps;

pub use error::IntervalError;
pub use interval::Interval;
pub use list::IntervalList;
pub use timestamps::Timestamps;
