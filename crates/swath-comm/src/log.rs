//! Rank-aware error reporting.
//!
//! Messages are reported once per communicator instead of once per
//! process: only rank 0 emits the `tracing` event. In single-process
//! mode (`None`) the event is always emitted. No subscriber is
//! installed here; binaries choose their own.

use std::fmt;
use std::sync::Arc;

use crate::communicator::Communicator;

/// Returns `true` if this process reports for `comm`.
pub fn is_reporter(comm: Option<&Arc<dyn Communicator>>) -> bool {
    comm.is_none_or(|c| c.rank() == 0)
}

fn rank_size(comm: Option<&Arc<dyn Communicator>>) -> (usize, usize) {
    comm.map_or((0, 1), |c| (c.rank(), c.size()))
}

/// Emit an error event from rank 0 of `comm`.
pub fn error_rank(comm: Option<&Arc<dyn Communicator>>, msg: impl fmt::Display) {
    if is_reporter(comm) {
        let (rank, size) = rank_size(comm);
        tracing::error!(rank, size, "{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalWorld;

    #[test]
    fn single_process_always_reports() {
        assert!(is_reporter(None));
        error_rank(None, "no subscriber installed; must not panic");
    }

    #[test]
    fn only_rank_zero_reports() {
        let out = LocalWorld::run(3, |comm| is_reporter(Some(&comm)));
        assert_eq!(out, vec![true, false, false]);
    }
}
