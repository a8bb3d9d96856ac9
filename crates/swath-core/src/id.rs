//! Strongly-typed observation identifiers.

use std::fmt;

/// Unique identifier of an observation record.
///
/// Assigned upstream when the record is created. Uniqueness within a
/// collection is a convention of the producer and is not enforced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObsUid(pub u64);

impl fmt::Display for ObsUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObsUid {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
