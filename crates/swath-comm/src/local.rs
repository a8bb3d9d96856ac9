//! In-process communicator backend.
//!
//! [`LocalWorld`] wires `n` [`LocalComm`] endpoints together with
//! unbounded crossbeam channels, one inbox per rank. Sends never block.
//! A receive first scans the messages already set aside by earlier
//! receives, then drains the inbox, setting aside anything that does not
//! match `(source, tag)`. Arrival order is kept, so messages between one
//! pair of ranks with one tag are received in send order.
//!
//! Dropping an endpoint marks its rank as gone. A receive waiting on a
//! gone rank fails with [`CommError::Disconnected`] once every message
//! that rank sent has been drained, so a rank that panics or returns
//! early cannot leave its peers blocked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use swath_core::Value;

use crate::communicator::{Communicator, Tag};
use crate::error::CommError;

struct Envelope {
    source: usize,
    tag: Tag,
    value: Value,
}

/// One rank's endpoint in a [`LocalWorld`].
pub struct LocalComm {
    rank: usize,
    peers: Vec<Sender<Envelope>>,
    inbox: Receiver<Envelope>,
    pending: Mutex<Vec<Envelope>>,
    alive: Arc<[AtomicBool]>,
}

/// How long a blocked receive waits before checking whether its source
/// rank is still alive.
const LIVENESS_POLL: Duration = Duration::from_millis(10);

impl LocalComm {
    fn take_pending(&self, source: usize, tag: Tag) -> Option<Value> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let pos = pending
            .iter()
            .position(|e| e.source == source && e.tag == tag)?;
        Some(pending.remove(pos).value)
    }

    /// Match `envelope` against `(source, tag)`, setting it aside if it
    /// is for a later receive.
    fn accept(&self, envelope: Envelope, source: usize, tag: Tag) -> Option<Value> {
        if envelope.source == source && envelope.tag == tag {
            return Some(envelope.value);
        }
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope);
        None
    }

    fn is_alive(&self, rank: usize) -> bool {
        self.alive[rank].load(Ordering::Acquire)
    }
}

impl Drop for LocalComm {
    fn drop(&mut self) {
        self.alive[self.rank].store(false, Ordering::Release);
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn transmit(&self, value: Value, dest: usize, tag: Tag) -> Result<(), CommError> {
        let peer = self.peers.get(dest).ok_or(CommError::InvalidRank {
            rank: dest,
            size: self.peers.len(),
        })?;
        peer.send(Envelope {
            source: self.rank,
            tag,
            value,
        })
        .map_err(|_| CommError::Disconnected { peer: dest })
    }

    fn receive(&self, source: usize, tag: Tag) -> Result<Value, CommError> {
        self.check_rank(source)?;
        if let Some(value) = self.take_pending(source, tag) {
            return Ok(value);
        }
        loop {
            match self.inbox.recv_timeout(LIVENESS_POLL) {
                Ok(envelope) => {
                    if let Some(value) = self.accept(envelope, source, tag) {
                        return Ok(value);
                    }
                }
                Err(RecvTimeoutError::Timeout) if self.is_alive(source) => {}
                Err(RecvTimeoutError::Timeout) => {
                    // The source is gone, so everything it sent is queued.
                    while let Ok(envelope) = self.inbox.try_recv() {
                        if let Some(value) = self.accept(envelope, source, tag) {
                            return Ok(value);
                        }
                    }
                    return Err(CommError::Disconnected { peer: source });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CommError::Disconnected { peer: source });
                }
            }
        }
    }
}

/// Factory for connected in-process endpoints.
pub struct LocalWorld;

impl LocalWorld {
    /// Create `size` connected endpoints, indexed by rank.
    pub fn endpoints(size: usize) -> Vec<LocalComm> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| crossbeam_channel::unbounded()).unzip();
        let alive: Arc<[AtomicBool]> = (0..size).map(|_| AtomicBool::new(true)).collect();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalComm {
                rank,
                peers: senders.clone(),
                inbox,
                pending: Mutex::new(Vec::new()),
                alive: Arc::clone(&alive),
            })
            .collect()
    }

    /// Run `f` once per rank, each on its own thread, and return the
    /// results in rank order.
    ///
    /// # Panics
    ///
    /// Re-raises the panic of the lowest rank that panicked, after every
    /// rank thread has finished. Peers blocked on a panicked rank see
    /// [`CommError::Disconnected`] rather than waiting forever.
    pub fn run<T, F>(size: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Arc<dyn Communicator>) -> T + Sync,
    {
        let f = &f;
        thread::scope(|scope| {
            let handles: Vec<_> = Self::endpoints(size)
                .into_iter()
                .map(|endpoint| {
                    let rank = endpoint.rank;
                    thread::Builder::new()
                        .name(format!("swath-rank-{rank}"))
                        .spawn_scoped(scope, move || {
                            let comm: Arc<dyn Communicator> = Arc::new(endpoint);
                            f(comm)
                        })
                        .expect("failed to spawn rank thread")
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communicator::{ReduceOp, MAX_RAW_TAG};

    #[test]
    fn point_to_point_ring() {
        let out = LocalWorld::run(4, |comm| {
            let next = (comm.rank() + 1) % comm.size();
            let prev = (comm.rank() + comm.size() - 1) % comm.size();
            comm.send(Value::Int(comm.rank() as i64), next, 7).unwrap();
            comm.recv(prev, 7).unwrap()
        });
        assert_eq!(
            out,
            vec![Value::Int(3), Value::Int(0), Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn receive_sets_aside_other_tags() {
        let out = LocalWorld::run(2, |comm| {
            if comm.rank() == 0 {
                comm.send(Value::from("first"), 1, 1).unwrap();
                comm.send(Value::from("second"), 1, 2).unwrap();
                comm.send(Value::from("third"), 1, 1).unwrap();
                Vec::new()
            } else {
                vec![
                    comm.recv(0, 2).unwrap(),
                    comm.recv(0, 1).unwrap(),
                    comm.recv(0, 1).unwrap(),
                ]
            }
        });
        assert_eq!(
            out[1],
            vec![Value::from("second"), Value::from("first"), Value::from("third")]
        );
    }

    #[test]
    fn collectives_agree_across_ranks() {
        let out = LocalWorld::run(3, |comm| {
            let rank = comm.rank() as i64;
            let all = comm.allgather(Value::Int(rank * 10)).unwrap();
            let sum = comm.allreduce(Value::Int(rank), ReduceOp::Sum).unwrap();
            let root = comm.broadcast(Value::Int(rank + 100), 2).unwrap();
            comm.barrier().unwrap();
            (all, sum, root)
        });
        for (all, sum, root) in out {
            assert_eq!(all, vec![Value::Int(0), Value::Int(10), Value::Int(20)]);
            assert_eq!(sum, Value::Int(3));
            assert_eq!(root, Value::Int(102));
        }
    }

    #[test]
    fn gather_returns_on_root_only() {
        let out = LocalWorld::run(3, |comm| comm.gather(Value::Bool(true), 1).unwrap());
        assert!(out[0].is_none());
        assert_eq!(out[1].as_ref().map(Vec::len), Some(3));
        assert!(out[2].is_none());
    }

    #[test]
    fn user_tags_and_ranks_are_checked() {
        let comm = LocalWorld::endpoints(2).remove(0);
        assert_eq!(
            comm.send(Value::Null, 0, MAX_RAW_TAG),
            Err(CommError::ReservedTag { tag: MAX_RAW_TAG })
        );
        assert_eq!(
            comm.send(Value::Null, 5, 0),
            Err(CommError::InvalidRank { rank: 5, size: 2 })
        );
    }

    #[test]
    fn receive_from_finished_rank_drains_then_disconnects() {
        let out = LocalWorld::run(2, |comm| {
            if comm.rank() == 0 {
                comm.send(Value::Int(1), 1, 3).unwrap();
                Vec::new()
            } else {
                vec![comm.recv(0, 3), comm.recv(0, 3)]
            }
        });
        assert_eq!(
            out[1],
            vec![Ok(Value::Int(1)), Err(CommError::Disconnected { peer: 0 })]
        );
    }

    #[test]
    fn panicking_rank_fails_the_run_instead_of_hanging() {
        let result = std::panic::catch_unwind(|| {
            LocalWorld::run(3, |comm| {
                if comm.rank() == 1 {
                    panic!("rank 1 failed");
                }
                comm.barrier()
            })
        });
        assert!(result.is_err());
    }

    #[test]
    fn peers_of_a_panicking_rank_see_disconnect() {
        let errors = Mutex::new(Vec::new());
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            LocalWorld::run(2, |comm| {
                if comm.rank() == 1 {
                    panic!("rank 1 failed");
                }
                let result = comm.recv(1, 0);
                errors.lock().unwrap().push(result);
            })
        }));
        assert_eq!(
            errors.into_inner().unwrap(),
            vec![Err(CommError::Disconnected { peer: 1 })]
        );
    }

    #[test]
    fn single_rank_world_collectives_are_identities() {
        let out = LocalWorld::run(1, |comm| {
            (
                comm.allgather(Value::from("x")).unwrap(),
                comm.allreduce(Value::from(1.5), ReduceOp::Max).unwrap(),
            )
        });
        assert_eq!(out[0].0, vec![Value::from("x")]);
        assert_eq!(out[0].1, Value::from(1.5));
    }
}
