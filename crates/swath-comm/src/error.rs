//! Error types for communicator operations.

use std::fmt;

/// Errors arising from communicator construction or message passing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A source or destination rank is outside the communicator.
    InvalidRank {
        /// The offending rank.
        rank: usize,
        /// Number of ranks in the communicator.
        size: usize,
    },
    /// A peer's endpoint is gone and the message cannot be delivered
    /// or will never arrive.
    Disconnected {
        /// Rank of the unreachable peer.
        peer: usize,
    },
    /// The requested process layout cannot be built.
    InvalidTopology {
        /// What went wrong.
        reason: String,
    },
    /// Values passed to a reduction do not support the operation.
    ReduceType {
        /// What went wrong.
        reason: String,
    },
    /// A user message used a tag from the reserved range.
    ReservedTag {
        /// The rejected tag.
        tag: u64,
    },
    /// A collective received a payload of the wrong shape.
    Protocol {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { rank, size } => {
                write!(f, "rank {rank} is out of range for communicator of size {size}")
            }
            Self::Disconnected { peer } => write!(f, "peer rank {peer} is disconnected"),
            Self::InvalidTopology { reason } => write!(f, "invalid topology: {reason}"),
            Self::ReduceType { reason } => write!(f, "invalid reduction: {reason}"),
            Self::ReservedTag { tag } => write!(f, "tag {tag:#x} is reserved"),
            Self::Protocol { reason } => write!(f, "protocol violation: {reason}"),
        }
    }
}

impl std::error::Error for CommError {}
