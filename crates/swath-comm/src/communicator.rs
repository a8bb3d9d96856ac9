//! The communicator contract and its point-to-point collectives.
//!
//! Backends implement [`Communicator::transmit`] and
//! [`Communicator::receive`]; every collective is a provided method
//! layered on them, rooted at rank 0. All operations block until the
//! peers they depend on reach the matching call. A rank that skips a
//! collective its peers enter deadlocks the group; that ordering is the
//! caller's responsibility.
//!
//! Tags up to [`MAX_USER_TAG`] are free for user messages. Tags above
//! it are reserved for collectives and sub-communicator contexts.

use swath_core::Value;

use crate::error::CommError;

/// Message tag. See the module docs for the reserved range.
pub type Tag = u64;

/// Largest tag accepted by [`Communicator::send`] and [`Communicator::recv`].
pub const MAX_USER_TAG: Tag = u32::MAX as Tag;

const COLLECTIVE_BASE: Tag = MAX_USER_TAG + 1;
const TAG_BCAST: Tag = COLLECTIVE_BASE + 1;
const TAG_GATHER: Tag = COLLECTIVE_BASE + 2;

/// Largest tag a backend must carry. Sub-communicators fold a context
/// id into the bits above this.
pub(crate) const MAX_RAW_TAG: Tag = (1 << 40) - 1;

/// Reduction operators for [`Communicator::allreduce`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    /// Numeric sum. Integers stay integers; any float widens the result.
    Sum,
    /// Numeric minimum.
    Min,
    /// Numeric maximum.
    Max,
    /// Boolean conjunction.
    LogicalAnd,
    /// Boolean disjunction.
    LogicalOr,
}

impl ReduceOp {
    /// Fold `values` with this operator.
    pub fn apply(self, values: &[Value]) -> Result<Value, CommError> {
        if values.is_empty() {
            return Err(CommError::ReduceType {
                reason: "no values to reduce".to_string(),
            });
        }
        match self {
            Self::LogicalAnd | Self::LogicalOr => {
                let mut flags = Vec::with_capacity(values.len());
                for v in values {
                    flags.push(v.as_bool().ok_or_else(|| CommError::ReduceType {
                        reason: format!("{self:?} requires bool, got {}", v.type_name()),
                    })?);
                }
                let out = if self == Self::LogicalAnd {
                    flags.iter().all(|&b| b)
                } else {
                    flags.iter().any(|&b| b)
                };
                Ok(Value::Bool(out))
            }
            Self::Sum | Self::Min | Self::Max => {
                if let Some(ints) = values.iter().map(Value::as_int).collect::<Option<Vec<_>>>() {
                    return self.fold_ints(&ints);
                }
                let mut floats = Vec::with_capacity(values.len());
                for v in values {
                    floats.push(v.as_float().ok_or_else(|| CommError::ReduceType {
                        reason: format!("{self:?} requires numbers, got {}", v.type_name()),
                    })?);
                }
                let out: f64 = match self {
                    Self::Sum => floats.iter().sum(),
                    Self::Min => floats.iter().copied().fold(f64::INFINITY, f64::min),
                    _ => floats.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                };
                Ok(Value::from(out))
            }
        }
    }

    fn fold_ints(self, ints: &[i64]) -> Result<Value, CommError> {
        let out = match self {
            Self::Sum => ints
                .iter()
                .try_fold(0i64, |acc, &v| acc.checked_add(v))
                .ok_or_else(|| CommError::ReduceType {
                    reason: "integer sum overflowed".to_string(),
                })?,
            Self::Min => ints.iter().copied().min().unwrap_or_default(),
            _ => ints.iter().copied().max().unwrap_or_default(),
        };
        Ok(Value::Int(out))
    }
}

/// A group of cooperating processes that exchange [`Value`] messages.
///
/// Ranks are `0..size()`. Implementations must deliver messages between
/// one sender and one receiver with the same tag in the order they were
/// sent.
pub trait Communicator: Send + Sync {
    /// This process's rank.
    fn rank(&self) -> usize;

    /// Number of processes.
    fn size(&self) -> usize;

    /// Deliver `value` to `dest` without checking the tag range.
    ///
    /// Backend primitive; callers use [`send`](Self::send). Must not
    /// block waiting for the receiver.
    fn transmit(&self, value: Value, dest: usize, tag: Tag) -> Result<(), CommError>;

    /// Block until a message from `source` with `tag` arrives.
    ///
    /// Backend primitive; callers use [`recv`](Self::recv). Messages
    /// that do not match are kept for later receives.
    fn receive(&self, source: usize, tag: Tag) -> Result<Value, CommError>;

    /// Send a user message.
    fn send(&self, value: Value, dest: usize, tag: Tag) -> Result<(), CommError> {
        check_user_tag(tag)?;
        self.check_rank(dest)?;
        self.transmit(value, dest, tag)
    }

    /// Receive a user message.
    fn recv(&self, source: usize, tag: Tag) -> Result<Value, CommError> {
        check_user_tag(tag)?;
        self.check_rank(source)?;
        self.receive(source, tag)
    }

    /// Error unless `rank` is a member of this communicator.
    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank < self.size() {
            Ok(())
        } else {
            Err(CommError::InvalidRank {
                rank,
                size: self.size(),
            })
        }
    }

    /// Collect one value per rank on `root`, in rank order.
    ///
    /// Returns `Some` on the root and `None` elsewhere.
    fn gather(&self, value: Value, root: usize) -> Result<Option<Vec<Value>>, CommError> {
        self.check_rank(root)?;
        if self.rank() != root {
            self.transmit(value, root, TAG_GATHER)?;
            return Ok(None);
        }
        let mut own = Some(value);
        let mut out = Vec::with_capacity(self.size());
        for source in 0..self.size() {
            if source == root {
                out.push(own.take().unwrap_or(Value::Null));
            } else {
                out.push(self.receive(source, TAG_GATHER)?);
            }
        }
        Ok(Some(out))
    }

    /// Distribute `root`'s value to every rank. Non-root inputs are ignored.
    fn broadcast(&self, value: Value, root: usize) -> Result<Value, CommError> {
        self.check_rank(root)?;
        if self.rank() != root {
            return self.receive(root, TAG_BCAST);
        }
        for dest in (0..self.size()).filter(|&r| r != root) {
            self.transmit(value.clone(), dest, TAG_BCAST)?;
        }
        Ok(value)
    }

    /// Collect one value per rank on every rank, in rank order.
    fn allgather(&self, value: Value) -> Result<Vec<Value>, CommError> {
        let gathered = self.gather(value, 0)?.map(Value::List).unwrap_or(Value::Null);
        let all = self.broadcast(gathered, 0)?;
        match all.into_list() {
            Some(values) if values.len() == self.size() => Ok(values),
            _ => Err(CommError::Protocol {
                reason: "allgather did not return one value per rank".to_string(),
            }),
        }
    }

    /// Combine one value per rank with `op` and return the result on
    /// every rank.
    fn allreduce(&self, value: Value, op: ReduceOp) -> Result<Value, CommError> {
        let values = self.allgather(value)?;
        op.apply(&values)
    }

    /// Block until every rank has entered the barrier.
    fn barrier(&self) -> Result<(), CommError> {
        self.allgather(Value::Null).map(|_| ())
    }
}

fn check_user_tag(tag: Tag) -> Result<(), CommError> {
    if tag > MAX_USER_TAG {
        Err(CommError::ReservedTag { tag })
    } else {
        Ok(())
    }
}
