//! Communicators over a subset of a parent's ranks.

use std::sync::Arc;

use swath_core::Value;

use crate::communicator::{Communicator, Tag, MAX_RAW_TAG};
use crate::error::CommError;

/// A re-ranked subset of a parent communicator.
///
/// Rank `i` of the sub-communicator is parent rank `members[i]`. Traffic
/// is isolated from the parent and from sibling sub-communicators by
/// folding `context` into the tag bits above the backend's raw tag
/// range, so siblings built from the same parent must use distinct
/// contexts. Sub-communicators cannot be nested.
pub struct SubComm {
    parent: Arc<dyn Communicator>,
    members: Vec<usize>,
    rank: usize,
    context: u64,
}

impl SubComm {
    /// Build the sub-communicator containing `members` (parent ranks,
    /// in sub-rank order). The calling process must be a member.
    pub fn new(
        parent: Arc<dyn Communicator>,
        members: Vec<usize>,
        context: u64,
    ) -> Result<Self, CommError> {
        if context >= (u64::MAX >> 40) {
            return Err(CommError::InvalidTopology {
                reason: format!("context id {context} is too large"),
            });
        }
        for &m in &members {
            parent.check_rank(m)?;
        }
        let me = parent.rank();
        let rank = members
            .iter()
            .position(|&m| m == me)
            .ok_or_else(|| CommError::InvalidTopology {
                reason: format!("parent rank {me} is not a member of {members:?}"),
            })?;
        Ok(Self {
            parent,
            members,
            rank,
            context,
        })
    }

    /// Parent ranks of the members, in sub-rank order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    fn fold(&self, tag: Tag) -> Result<Tag, CommError> {
        if tag > MAX_RAW_TAG {
            return Err(CommError::ReservedTag { tag });
        }
        Ok(((self.context + 1) << 40) | tag)
    }

    fn parent_rank(&self, rank: usize) -> Result<usize, CommError> {
        self.check_rank(rank)?;
        Ok(self.members[rank])
    }
}

impl Communicator for SubComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.members.len()
    }

    fn transmit(&self, value: Value, dest: usize, tag: Tag) -> Result<(), CommError> {
        let dest = self.parent_rank(dest)?;
        self.parent.transmit(value, dest, self.fold(tag)?)
    }

    fn receive(&self, source: usize, tag: Tag) -> Result<Value, CommError> {
        let source = self.parent_rank(source)?;
        self.parent.receive(source, self.fold(tag)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalWorld;

    #[test]
    fn non_member_is_rejected() {
        let out = LocalWorld::run(2, |comm| {
            SubComm::new(comm, vec![0], 0).map(|s| s.size())
        });
        assert_eq!(out[0], Ok(1));
        match &out[1] {
            Err(CommError::InvalidTopology { .. }) => {}
            other => panic!("expected InvalidTopology, got {other:?}"),
        }
    }

    #[test]
    fn members_must_exist_in_parent() {
        let out = LocalWorld::run(1, |comm| SubComm::new(comm, vec![0, 3], 0).map(|_| ()));
        assert_eq!(out[0], Err(CommError::InvalidRank { rank: 3, size: 1 }));
    }

    #[test]
    fn sibling_traffic_is_isolated() {
        // Ranks {0,2} and {1,3} form two subs; each allgathers its parent ranks.
        let out = LocalWorld::run(4, |comm| {
            let me = comm.rank();
            let members = if me % 2 == 0 { vec![0, 2] } else { vec![1, 3] };
            let sub = SubComm::new(comm, members, (me % 2) as u64).unwrap();
            sub.allgather(Value::Int(me as i64)).unwrap()
        });
        assert_eq!(out[0], vec![Value::Int(0), Value::Int(2)]);
        assert_eq!(out[1], vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(out[2], out[0]);
        assert_eq!(out[3], out[1]);
    }

    #[test]
    fn reranks_in_member_order() {
        let out = LocalWorld::run(3, |comm| {
            let sub = SubComm::new(comm, vec![2, 1, 0], 5).unwrap();
            (sub.rank(), sub.broadcast(Value::Int(sub.rank() as i64 * 7), 0).unwrap())
        });
        assert_eq!(out[0], (2, Value::Int(0)));
        assert_eq!(out[2], (0, Value::Int(0)));
        assert_eq!(out[1].0, 1);
    }
}
