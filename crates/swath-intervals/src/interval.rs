//! A single contiguous span of samples.

use std::cmp::Ordering;
use std::fmt;

use swath_core::isclose;

use crate::error::IntervalError;

/// One contiguous span, keyed both by time and by sample index.
///
/// `start`/`stop` are the times (seconds) of the `first`/`last` samples,
/// with `last` inclusive. Intervals produced by an
/// [`IntervalList`](crate::IntervalList) always have all four fields
/// assigned and consistent with the list's timestamps. A default
/// interval has no fields assigned; reading an unassigned field is an
/// [`IntervalError::Unassigned`] error.
///
/// Two intervals are equal when their sample bounds match exactly and
/// their times match within [`swath_core::isclose`] tolerance.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interval {
    start: Option<f64>,
    stop: Option<f64>,
    first: Option<usize>,
    last: Option<usize>,
}

impl Interval {
    /// Build a fully-assigned interval, rejecting negative times.
    pub fn new(start: f64, stop: f64, first: usize, last: usize) -> Result<Self, IntervalError> {
        let mut iv = Self::default();
        iv.set_start(start)?;
        iv.set_stop(stop)?;
        iv.set_first(first);
        iv.set_last(last);
        Ok(iv)
    }

    /// Build an interval from values already resolved against a
    /// timestamp array. No validation is applied.
    pub(crate) fn resolved(start: f64, stop: f64, first: usize, last: usize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            first: Some(first),
            last: Some(last),
        }
    }

    /// Start time in seconds.
    pub fn start(&self) -> Result<f64, IntervalError> {
        self.start.ok_or(IntervalError::Unassigned { field: "start" })
    }

    /// Stop time in seconds.
    pub fn stop(&self) -> Result<f64, IntervalError> {
        self.stop.ok_or(IntervalError::Unassigned { field: "stop" })
    }

    /// First sample index.
    pub fn first(&self) -> Result<usize, IntervalError> {
        self.first.ok_or(IntervalError::Unassigned { field: "first" })
    }

    /// Last sample index (inclusive).
    pub fn last(&self) -> Result<usize, IntervalError> {
        self.last.ok_or(IntervalError::Unassigned { field: "last" })
    }

    /// `(first, last)` in one call.
    pub fn sample_bounds(&self) -> Result<(usize, usize), IntervalError> {
        Ok((self.first()?, self.last()?))
    }

    /// Assign the start time. Negative times are rejected.
    pub fn set_start(&mut self, start: f64) -> Result<(), IntervalError> {
        self.start = Some(non_negative("start", start)?);
        Ok(())
    }

    /// Assign the stop time. Negative times are rejected.
    pub fn set_stop(&mut self, stop: f64) -> Result<(), IntervalError> {
        self.stop = Some(non_negative("stop", stop)?);
        Ok(())
    }

    /// Assign the first sample index.
    pub fn set_first(&mut self, first: usize) {
        self.first = Some(first);
    }

    /// Assign the last sample index.
    pub fn set_last(&mut self, last: usize) {
        self.last = Some(last);
    }

    /// Duration `stop - start` in seconds.
    pub fn range(&self) -> Result<f64, IntervalError> {
        Ok(self.stop()? - self.start()?)
    }

    /// Number of samples `last - first + 1`.
    pub fn samples(&self) -> Result<usize, IntervalError> {
        let (first, last) = self.sample_bounds()?;
        if last < first {
            return Err(IntervalError::InvertedSpan { first, last });
        }
        Ok(last - first + 1)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, IntervalError> {
    if value < 0.0 {
        Err(IntervalError::Negative { field, value })
    } else {
        Ok(value)
    }
}

fn close_or_both_unset(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => isclose(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first
            && self.last == other.last
            && close_or_both_unset(self.start, other.start)
            && close_or_both_unset(self.stop, other.stop)
    }
}

impl PartialOrd for Interval {
    /// Orders by `(first, last)`. Intervals with equal sample bounds but
    /// times outside tolerance are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.first, self.last).cmp(&(other.first, other.last)) {
            Ordering::Equal if self != other => None,
            ord => Some(ord),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(v: Option<T>) -> String {
            v.map_or_else(|| "?".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "<Interval {} - {} [{}:{}]>",
            opt(self.start),
            opt(self.stop),
            opt(self.first),
            opt(self.last),
        )
    }
}
