//! Process-group layout configuration.

use crate::error::CommError;

/// How the world communicator is divided into process groups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommConfig {
    /// Processes per group. `None` = one group spanning the world.
    pub group_size: Option<usize>,
}

impl CommConfig {
    /// Configuration with a fixed number of processes per group.
    pub fn with_group_size(group_size: usize) -> Self {
        Self {
            group_size: Some(group_size),
        }
    }

    /// Resolve the group size for a world of `world_size` processes.
    ///
    /// An explicit size must be non-zero and divide the world size.
    pub fn resolved_group_size(&self, world_size: usize) -> Result<usize, CommError> {
        if world_size == 0 {
            return Err(CommError::InvalidTopology {
                reason: "world communicator has no processes".to_string(),
            });
        }
        match self.group_size {
            None => Ok(world_size),
            Some(0) => Err(CommError::InvalidTopology {
                reason: "group_size must be at least 1".to_string(),
            }),
            Some(n) if world_size % n != 0 => Err(CommError::InvalidTopology {
                reason: format!("group_size {n} does not divide world size {world_size}"),
            }),
            Some(n) => Ok(n),
        }
    }
}
