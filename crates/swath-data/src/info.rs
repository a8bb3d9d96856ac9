//! Rank-ordered report of a distributed collection.

use std::io::{self, Write};

use swath_comm::CommError;
use swath_core::Value;

use crate::data::Data;
use crate::error::DataError;

impl Data {
    /// Write a summary of every group's observations.
    ///
    /// Only world rank 0 writes, to `out` or to stdout when `out` is
    /// `None`. Rank 0 of each group builds its group's summary; world
    /// rank 0 writes its own, then receives the others over the rank
    /// communicator tagged by group id and writes them in group order.
    /// A world barrier follows each group.
    ///
    /// Collective over the world communicator.
    pub fn info(&self, out: Option<&mut dyn Write>) -> Result<(), DataError> {
        let mut stdout;
        let out: &mut dyn Write = match out {
            Some(w) => w,
            None => {
                stdout = io::stdout().lock();
                &mut stdout
            }
        };
        let comm = self.comm();
        tracing::debug!(world_rank = comm.world_rank(), group = comm.group(), "info");

        match comm.comm_world() {
            None => writeln!(out, "Data distributed over a single process")?,
            Some(world) if world.rank() == 0 => writeln!(
                out,
                "Data distributed over {} processes in {} groups",
                comm.world_size(),
                comm.ngroups()
            )?,
            Some(_) => {}
        }

        let mut group_summary = String::new();
        if comm.group_rank() == 0 {
            for ob in self.obs() {
                group_summary.push_str(&ob.borrow().to_string());
                group_summary.push('\n');
            }
        }
        if comm.world_rank() == 0 {
            out.write_all(group_summary.as_bytes())?;
        }

        if let (Some(world), Some(across)) = (comm.comm_world(), comm.comm_group_rank()) {
            for g in 1..comm.ngroups() {
                let tag = g as u64;
                if world.rank() == 0 {
                    let received = across.recv(g, tag)?;
                    let Some(summary) = received.as_str() else {
                        return Err(CommError::Protocol {
                            reason: format!("group {g} summary is not a string: {received}"),
                        }
                        .into());
                    };
                    out.write_all(summary.as_bytes())?;
                } else if g == comm.group() && comm.group_rank() == 0 {
                    across.send(Value::Str(group_summary.clone()), 0, tag)?;
                }
                world.barrier()?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
