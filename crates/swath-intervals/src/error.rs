//! Error types for interval construction and algebra.

use std::fmt;

/// Errors arising from interval construction, field access or the
/// interval algebra.
#[derive(Clone, Debug, PartialEq)]
pub enum IntervalError {
    /// A field of an [`Interval`](crate::Interval) was read before it
    /// was assigned.
    Unassigned {
        /// Name of the unassigned field.
        field: &'static str,
    },
    /// A negative time was written to an interval field.
    Negative {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A timestamp array failed validation.
    InvalidTimestamps {
        /// What went wrong.
        reason: String,
    },
    /// A sample index lies beyond the end of the timestamp array.
    SampleOutOfRange {
        /// The offending sample index.
        index: usize,
        /// Number of samples in the timestamp array.
        len: usize,
    },
    /// A sample span has `last < first`.
    InvertedSpan {
        /// First sample of the span.
        first: usize,
        /// Last (inclusive) sample of the span.
        last: usize,
    },
    /// A time span encloses no sample of the timestamp array.
    EmptyTimeSpan {
        /// Requested start time.
        start: f64,
        /// Requested stop time.
        stop: f64,
    },
    /// An interval's times disagree with the timestamps at its sample
    /// bounds.
    InconsistentTimes {
        /// Position of the offending interval.
        index: usize,
    },
    /// Spans are not sorted by increasing sample or they overlap.
    Unordered {
        /// Position of the first span that breaks the ordering.
        index: usize,
    },
    /// Two interval lists are anchored to incompatible timestamp arrays.
    IncompatibleTimestamps {
        /// The operation that was attempted.
        op: &'static str,
        /// How the timestamp arrays differ.
        reason: String,
    },
}

impl fmt::Display for IntervalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned { field } => write!(f, "interval {field} is not yet assigned"),
            Self::Negative { field, value } => {
                write!(f, "negative interval {field} is not valid: {value}")
            }
            Self::InvalidTimestamps { reason } => write!(f, "invalid timestamps: {reason}"),
            Self::SampleOutOfRange { index, len } => {
                write!(f, "sample {index} out of range for {len} timestamps")
            }
            Self::InvertedSpan { first, last } => {
                write!(f, "sample span [{first}, {last}] has last before first")
            }
            Self::EmptyTimeSpan { start, stop } => {
                write!(f, "time span ({start}, {stop}) encloses no samples")
            }
            Self::InconsistentTimes { index } => write!(
                f,
                "interval {index} times do not match the timestamps at its samples"
            ),
            Self::Unordered { index } => {
                write!(f, "span {index} is out of order or overlaps its predecessor")
            }
            Self::IncompatibleTimestamps { op, reason } => {
                write!(f, "cannot {op} interval lists with different timestamps: {reason}")
            }
        }
    }
}

impl std::error::Error for IntervalError {}
