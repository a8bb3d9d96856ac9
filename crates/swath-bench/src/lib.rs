//! Benchmark inputs for the swath interval algebra.
//!
//! - [`timestamps`]: a uniform sample-time array.
//! - [`random_list`]: a seeded random interval list with a given span count.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swath_intervals::{IntervalError, IntervalList, Timestamps};

/// `n_samples` times at 200 Hz, the sample rate of a typical detector stream.
pub fn timestamps(n_samples: usize) -> Result<Timestamps, IntervalError> {
    Timestamps::uniform(0.0, 200.0, n_samples)
}

/// Up to `n_spans` non-overlapping, non-touching spans drawn from a
/// ChaCha8 stream seeded with `seed`.
///
/// The sample range is cut into `n_spans` equal slots and one span is
/// placed at a random offset and length inside each slot, leaving at
/// least one free sample at the slot's end. Slots too small to hold a
/// span are skipped.
pub fn random_list(
    ts: &Timestamps,
    n_spans: usize,
    seed: u64,
) -> Result<IntervalList, IntervalError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let slot = ts.len() / n_spans.max(1);
    let mut spans = Vec::with_capacity(n_spans);
    if slot >= 2 {
        for i in 0..n_spans {
            let base = i * slot;
            let first = base + (rng.next_u64() as usize) % (slot - 1);
            let room = base + slot - 1 - first;
            let last = first + (rng.next_u64() as usize) % room;
            spans.push((first, last));
        }
    }
    IntervalList::from_samplespans(ts.clone(), &spans)
}
