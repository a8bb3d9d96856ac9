//! Process-group layout over a world communicator.

use std::fmt;
use std::sync::Arc;

use swath_core::Value;

use crate::communicator::Communicator;
use crate::config::CommConfig;
use crate::error::CommError;
use crate::sub::SubComm;

const GROUP_CONTEXT: u64 = 1;
const RANK_CONTEXT: u64 = 2;

/// World, group and rank communicators for one process.
///
/// The world of `world_size` processes is cut into `ngroups` contiguous
/// groups of `group_size` processes. Process `r` belongs to group
/// `r / group_size` with in-group rank `r % group_size`. The rank
/// communicator links the processes that share an in-group rank, so its
/// rank `g` is group `g`'s member.
///
/// [`Comm::single`] has no communicators at all; every collective
/// helper on it returns its input unchanged.
#[derive(Clone)]
pub struct Comm {
    world_size: usize,
    world_rank: usize,
    group_size: usize,
    ngroups: usize,
    group: usize,
    group_rank: usize,
    world: Option<Arc<dyn Communicator>>,
    group_comm: Option<Arc<dyn Communicator>>,
    rank_comm: Option<Arc<dyn Communicator>>,
}

impl Comm {
    /// A non-distributed process: one process, one group.
    pub fn single() -> Self {
        Self {
            world_size: 1,
            world_rank: 0,
            group_size: 1,
            ngroups: 1,
            group: 0,
            group_rank: 0,
            world: None,
            group_comm: None,
            rank_comm: None,
        }
    }

    /// Split `world` into groups as described by `config`.
    ///
    /// Purely local: no messages are exchanged.
    pub fn new(world: Arc<dyn Communicator>, config: &CommConfig) -> Result<Self, CommError> {
        let world_size = world.size();
        let world_rank = world.rank();
        let group_size = config.resolved_group_size(world_size)?;
        let ngroups = world_size / group_size;
        let group = world_rank / group_size;
        let group_rank = world_rank % group_size;

        let group_members = (group * group_size..(group + 1) * group_size).collect();
        let rank_members = (0..ngroups).map(|g| g * group_size + group_rank).collect();
        let group_comm = SubComm::new(Arc::clone(&world), group_members, GROUP_CONTEXT)?;
        let rank_comm = SubComm::new(Arc::clone(&world), rank_members, RANK_CONTEXT)?;

        Ok(Self {
            world_size,
            world_rank,
            group_size,
            ngroups,
            group,
            group_rank,
            world: Some(world),
            group_comm: Some(Arc::new(group_comm)),
            rank_comm: Some(Arc::new(rank_comm)),
        })
    }

    /// Number of processes in the world.
    pub fn world_size(&self) -> usize {
        self.world_size
    }

    /// This process's world rank.
    pub fn world_rank(&self) -> usize {
        self.world_rank
    }

    /// Processes per group.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Number of groups.
    pub fn ngroups(&self) -> usize {
        self.ngroups
    }

    /// This process's group id.
    pub fn group(&self) -> usize {
        self.group
    }

    /// This process's rank within its group.
    pub fn group_rank(&self) -> usize {
        self.group_rank
    }

    /// The world communicator, or `None` in single-process mode.
    pub fn comm_world(&self) -> Option<&Arc<dyn Communicator>> {
        self.world.as_ref()
    }

    /// The communicator of this process's group.
    pub fn comm_group(&self) -> Option<&Arc<dyn Communicator>> {
        self.group_comm.as_ref()
    }

    /// The communicator across groups at this process's group rank.
    pub fn comm_group_rank(&self) -> Option<&Arc<dyn Communicator>> {
        self.rank_comm.as_ref()
    }

    /// Returns `true` when no communicator is attached.
    pub fn is_single(&self) -> bool {
        self.world.is_none()
    }

    /// All-gather `value` over the group, or `[value]` in single-process mode.
    pub fn allgather_group(&self, value: Value) -> Result<Vec<Value>, CommError> {
        match &self.group_comm {
            Some(comm) => comm.allgather(value),
            None => Ok(vec![value]),
        }
    }

    /// Barrier over the world. A no-op in single-process mode.
    pub fn barrier_world(&self) -> Result<(), CommError> {
        match &self.world {
            Some(comm) => comm.barrier(),
            None => Ok(()),
        }
    }
}

impl Default for Comm {
    fn default() -> Self {
        Self::single()
    }
}

impl fmt::Debug for Comm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comm")
            .field("world_size", &self.world_size)
            .field("world_rank", &self.world_rank)
            .field("group_size", &self.group_size)
            .field("ngroups", &self.ngroups)
            .field("group", &self.group)
            .field("group_rank", &self.group_rank)
            .field("single", &self.is_single())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalWorld;

    #[test]
    fn single_is_identity() {
        let comm = Comm::single();
        assert!(comm.is_single());
        assert!(comm.comm_group().is_none());
        assert_eq!(comm.allgather_group(Value::Int(4)), Ok(vec![Value::Int(4)]));
        assert_eq!(comm.barrier_world(), Ok(()));
    }

    #[test]
    fn layout_of_six_ranks_in_groups_of_two() {
        let out = LocalWorld::run(6, |world| {
            let comm = Comm::new(world, &CommConfig::with_group_size(2)).unwrap();
            (
                comm.ngroups(),
                comm.group(),
                comm.group_rank(),
                comm.comm_group().map(|c| c.size()),
                comm.comm_group_rank().map(|c| (c.rank(), c.size())),
            )
        });
        for (r, (ngroups, group, group_rank, gsize, rank_comm)) in out.into_iter().enumerate() {
            assert_eq!(ngroups, 3);
            assert_eq!(group, r / 2);
            assert_eq!(group_rank, r % 2);
            assert_eq!(gsize, Some(2));
            assert_eq!(rank_comm, Some((r / 2, 3)));
        }
    }

    #[test]
    fn group_allgather_stays_in_group() {
        let out = LocalWorld::run(4, |world| {
            let rank = world.rank() as i64;
            let comm = Comm::new(world, &CommConfig::with_group_size(2)).unwrap();
            comm.allgather_group(Value::Int(rank)).unwrap()
        });
        assert_eq!(out[0], vec![Value::Int(0), Value::Int(1)]);
        assert_eq!(out[3], vec![Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn bad_group_size_is_rejected() {
        let out = LocalWorld::run(3, |world| {
            Comm::new(world, &CommConfig::with_group_size(2)).map(|_| ())
        });
        assert!(out.iter().all(Result::is_err));
    }
}
