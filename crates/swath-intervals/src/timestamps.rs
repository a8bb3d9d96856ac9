//! Shared, validated sample times.

use std::ops::Deref;
use std::sync::Arc;

use swath_core::isclose;

use crate::error::IntervalError;

/// Strictly increasing sample times, in seconds, of one observation.
///
/// The array is reference-counted: every [`IntervalList`](crate::IntervalList)
/// built over the same observation holds a handle to the same storage,
/// and cloning a `Timestamps` never copies samples.
///
/// Invariants (checked by [`Timestamps::new`]): at least one sample,
/// every value finite, each value strictly greater than its predecessor.
#[derive(Clone, Debug)]
pub struct Timestamps {
    times: Arc<[f64]>,
}

impl Timestamps {
    /// Validate and wrap an array of sample times.
    pub fn new(times: impl Into<Arc<[f64]>>) -> Result<Self, IntervalError> {
        let times = times.into();
        if times.is_empty() {
            return Err(IntervalError::InvalidTimestamps {
                reason: "at least one sample is required".to_string(),
            });
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(IntervalError::InvalidTimestamps {
                reason: format!("sample {i} is not finite"),
            });
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(IntervalError::InvalidTimestamps {
                reason: format!("sample {} does not increase", i + 1),
            });
        }
        Ok(Self { times })
    }

    /// Build evenly spaced times `start + i / rate` for `n` samples.
    pub fn uniform(start: f64, rate: f64, n: usize) -> Result<Self, IntervalError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(IntervalError::InvalidTimestamps {
                reason: format!("sample rate must be finite and positive, got {rate}"),
            });
        }
        let times: Vec<f64> = (0..n).map(|i| start + i as f64 / rate).collect();
        Self::new(times)
    }

    /// Number of samples. Never zero.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false`; provided for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the first sample.
    pub fn first(&self) -> f64 {
        self.times[0]
    }

    /// Time of the last sample.
    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Time of the sample at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.times.get(index).copied()
    }

    /// Borrow the underlying slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    /// Returns `true` if both handles share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.times, &other.times)
    }

    /// Index of the first sample with time `>= t`.
    ///
    /// Returns `len()` when every sample is earlier than `t`.
    pub fn first_at_or_after(&self, t: f64) -> usize {
        self.times.partition_point(|&x| x < t)
    }

    /// Index of the last sample with time `<= t`, or `None` when every
    /// sample is later than `t`.
    pub fn last_at_or_before(&self, t: f64) -> Option<usize> {
        self.times.partition_point(|&x| x <= t).checked_sub(1)
    }

    /// Check that interval lists over `self` and `other` may be combined.
    ///
    /// The arrays must have the same length and their first and last
    /// times must agree within tolerance. Interior samples are not
    /// compared.
    pub fn check_compatible(&self, other: &Self, op: &'static str) -> Result<(), IntervalError> {
        if self.ptr_eq(other) {
            return Ok(());
        }
        if self.len() != other.len() {
            return Err(IntervalError::IncompatibleTimestamps {
                op,
                reason: format!("{} samples vs {} samples", self.len(), other.len()),
            });
        }
        if !isclose(self.first(), other.first()) || !isclose(self.last(), other.last()) {
            return Err(IntervalError::IncompatibleTimestamps {
                op,
                reason: format!(
                    "range [{}, {}] vs [{}, {}]",
                    self.first(),
                    self.last(),
                    other.first(),
                    other.last(),
                ),
            });
        }
        Ok(())
    }
}

impl Deref for Timestamps {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.times
    }
}

impl TryFrom<Vec<f64>> for Timestamps {
    type Error = IntervalError;

    fn try_from(times: Vec<f64>) -> Result<Self, IntervalError> {
        Self::new(times)
    }
}
