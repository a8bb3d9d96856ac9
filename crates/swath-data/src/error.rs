//! Error types for collection operations.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;
use swath_comm::CommError;

/// Errors arising from splitting, selecting or reporting a [`Data`](crate::Data)
/// collection.
#[derive(Clone, Debug, PartialEq)]
pub enum DataError {
    /// A split was requested with zero or several criteria.
    SplitCriteria {
        /// The criteria that were supplied.
        supplied: SmallVec<[&'static str; 4]>,
    },
    /// A required value was given for selection without a key.
    ValueWithoutKey,
    /// An observation lacks the field a full split requires.
    MissingField {
        /// Position of the observation in the collection.
        index: usize,
        /// Name of the missing field, or the missing key.
        field: String,
    },
    /// An observation carries different values for `key` on different
    /// processes of its group.
    InconsistentValue {
        /// Position of the observation in the collection.
        index: usize,
        /// The key whose values disagree.
        key: String,
    },
    /// A collective operation failed.
    Comm(CommError),
    /// Writing a report failed.
    Io(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SplitCriteria { supplied } if supplied.is_empty() => {
                write!(f, "exactly one split criterion is required, none supplied")
            }
            Self::SplitCriteria { supplied } => {
                write!(
                    f,
                    "exactly one split criterion is required, got {}",
                    supplied.join(", ")
                )
            }
            Self::ValueWithoutKey => {
                write!(f, "a required value was given without a key")
            }
            Self::MissingField { index, field } => {
                write!(f, "full split required, but observation {index} has no {field}")
            }
            Self::InconsistentValue { index, key } => {
                write!(
                    f,
                    "observation {index}, key '{key}' has inconsistent values across processes"
                )
            }
            Self::Comm(e) => write!(f, "communication failed: {e}"),
            Self::Io(reason) => write!(f, "report output failed: {reason}"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CommError> for DataError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
