//! Ordered, non-overlapping interval lists and their algebra.
//!
//! All operations work on sample indices; times are always recomputed
//! from the shared [`Timestamps`] at the resulting sample bounds, so the
//! two representations of every produced interval stay consistent.
//!
//! Adjacency rules differ by operation. [`simplify`](IntervalList::simplify)
//! and [`union`](IntervalList::union) merge spans that touch (`next.first
//! == last + 1`); [`intersect`](IntervalList::intersect) only emits true
//! overlaps and relies on a final `simplify` to coalesce the touching
//! pieces that interleaving can produce.

use std::fmt;
use std::ops::{BitAnd, BitOr, Index, Not};

use swath_core::isclose;

use crate::error::IntervalError;
use crate::interval::Interval;
use crate::timestamps::Timestamps;

/// A sorted sequence of non-overlapping [`Interval`]s over one
/// observation's samples.
///
/// Intervals are stored by increasing `first` and never overlap. They
/// may touch (be sample-adjacent) until [`simplify`](Self::simplify) is
/// called. The unary and binary operators return fresh lists; only
/// `simplify` mutates in place.
#[derive(Clone, Debug)]
pub struct IntervalList {
    timestamps: Timestamps,
    intervals: Vec<Interval>,
}

impl IntervalList {
    /// An empty list over `timestamps`.
    pub fn empty(timestamps: Timestamps) -> Self {
        Self {
            timestamps,
            intervals: Vec::new(),
        }
    }

    /// Build a list from explicit intervals.
    ///
    /// Every interval must be fully assigned and lie within the timestamp
    /// array. Its `start`/`stop` must match the timestamps at `first` and
    /// `last` within tolerance, and it must start after the previous
    /// interval's last sample.
    pub fn from_intervals(
        timestamps: Timestamps,
        intervals: impl IntoIterator<Item = Interval>,
    ) -> Result<Self, IntervalError> {
        let intervals: Vec<Interval> = intervals.into_iter().collect();
        let mut prev_last = None;
        for (index, iv) in intervals.iter().enumerate() {
            let (start, stop) = (iv.start()?, iv.stop()?);
            let (first, last) = iv.sample_bounds()?;
            check_span(&timestamps, first, last)?;
            if !isclose(start, timestamps[first]) || !isclose(stop, timestamps[last]) {
                return Err(IntervalError::InconsistentTimes { index });
            }
            check_order(prev_last, first, index)?;
            prev_last = Some(last);
        }
        Ok(Self {
            timestamps,
            intervals,
        })
    }

    /// Build a list from `(start, stop)` time pairs.
    ///
    /// Each span is shrunk to the samples it encloses: the first sample
    /// is the earliest with time `>= start` and the last sample is the
    /// latest with time `<= stop`. A span enclosing no sample is an
    /// [`IntervalError::EmptyTimeSpan`] error.
    pub fn from_timespans(
        timestamps: Timestamps,
        spans: &[(f64, f64)],
    ) -> Result<Self, IntervalError> {
        let mut intervals = Vec::with_capacity(spans.len());
        let mut prev_last = None;
        for (index, &(start, stop)) in spans.iter().enumerate() {
            let first = timestamps.first_at_or_after(start);
            let last = match timestamps.last_at_or_before(stop) {
                Some(last) if first < timestamps.len() && first <= last => last,
                _ => return Err(IntervalError::EmptyTimeSpan { start, stop }),
            };
            check_order(prev_last, first, index)?;
            prev_last = Some(last);
            intervals.push(resolve(&timestamps, first, last));
        }
        Ok(Self {
            timestamps,
            intervals,
        })
    }

    /// Build a list from inclusive `(first, last)` sample pairs.
    pub fn from_samplespans(
        timestamps: Timestamps,
        spans: &[(usize, usize)],
    ) -> Result<Self, IntervalError> {
        let mut intervals = Vec::with_capacity(spans.len());
        let mut prev_last = None;
        for (index, &(first, last)) in spans.iter().enumerate() {
            check_span(&timestamps, first, last)?;
            check_order(prev_last, first, index)?;
            prev_last = Some(last);
            intervals.push(resolve(&timestamps, first, last));
        }
        Ok(Self {
            timestamps,
            intervals,
        })
    }

    /// The timestamps this list is anchored to.
    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if no interval is stored.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The interval at position `index`.
    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    /// Iterate over the intervals in sample order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Borrow the intervals as a slice.
    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Returns `true` if an interval equal to `item` is stored.
    pub fn contains(&self, item: &Interval) -> bool {
        self.intervals.iter().any(|iv| iv == item)
    }

    /// Returns `true` if sample `index` falls inside any interval.
    pub fn contains_sample(&self, index: usize) -> bool {
        let pos = self
            .intervals
            .partition_point(|iv| iv.first().is_ok_and(|first| first <= index));
        pos > 0
            && self.intervals[pos - 1]
                .last()
                .is_ok_and(|last| index <= last)
    }

    /// Total number of samples covered.
    pub fn n_samples(&self) -> usize {
        self.intervals.iter().filter_map(|iv| iv.samples().ok()).sum()
    }

    fn span(&self, first: usize, last: usize) -> Interval {
        resolve(&self.timestamps, first, last)
    }

    fn with_intervals(&self, intervals: Vec<Interval>) -> Self {
        Self {
            timestamps: self.timestamps.clone(),
            intervals,
        }
    }

    /// Merge sample-adjacent intervals in place.
    ///
    /// One left-to-right pass: an interval whose `first` is exactly one
    /// past the running `last` extends the run, anything else closes it.
    /// The stored sequence is only replaced if merging shrank it.
    /// Idempotent.
    pub fn simplify(&mut self) -> Result<(), IntervalError> {
        let mut iter = self.intervals.iter();
        let Some(head) = iter.next() else {
            return Ok(());
        };
        let (mut first, mut last) = head.sample_bounds()?;
        let mut merged = Vec::with_capacity(self.intervals.len());
        for iv in iter {
            let (cur_first, cur_last) = iv.sample_bounds()?;
            if cur_first == last + 1 {
                last = cur_last;
            } else {
                merged.push(self.span(first, last));
                first = cur_first;
                last = cur_last;
            }
        }
        merged.push(self.span(first, last));
        if merged.len() < self.intervals.len() {
            self.intervals = merged;
        }
        Ok(())
    }

    /// The sample gaps not covered by this list.
    ///
    /// Emits the gap before the first interval, between consecutive
    /// intervals, and after the last interval. Whether the list touches
    /// either end of the timestamp array is decided by comparing the
    /// first interval's `start` and the last interval's `stop` to the
    /// end timestamps within tolerance. The complement of an empty list
    /// is the whole sample range.
    pub fn complement(&self) -> Result<Self, IntervalError> {
        let n = self.timestamps.len();
        let (Some(head), Some(tail)) = (self.intervals.first(), self.intervals.last()) else {
            return Ok(self.with_intervals(vec![self.span(0, n - 1)]));
        };

        let mut gaps = Vec::with_capacity(self.intervals.len() + 1);
        if !isclose(self.timestamps.first(), head.start()?) {
            let first = head.first()?;
            if first > 0 {
                gaps.push(self.span(0, first - 1));
            }
        }
        for pair in self.intervals.windows(2) {
            let cur_last = pair[0].last()?;
            let next_first = pair[1].first()?;
            if next_first > cur_last + 1 {
                gaps.push(self.span(cur_last + 1, next_first - 1));
            }
        }
        if !isclose(self.timestamps.last(), tail.stop()?) {
            let last = tail.last()?;
            if last + 1 < n {
                gaps.push(self.span(last + 1, n - 1));
            }
        }
        Ok(self.with_intervals(gaps))
    }

    /// Samples covered by both lists.
    ///
    /// Merge-walks both lists, emitting the overlap of the two current
    /// intervals whenever it is non-empty and advancing the side whose
    /// interval ends first (the right side on a tie). The result is
    /// simplified.
    pub fn intersect(&self, other: &Self) -> Result<Self, IntervalError> {
        self.timestamps.check_compatible(&other.timestamps, "intersect")?;
        if self.is_empty() || other.is_empty() {
            return Ok(self.with_intervals(Vec::new()));
        }

        let mut result = Vec::new();
        let (mut a, mut b) = (0, 0);
        while a < self.intervals.len() && b < other.intervals.len() {
            let (a_first, a_last) = self.intervals[a].sample_bounds()?;
            let (b_first, b_last) = other.intervals[b].sample_bounds()?;
            let low = a_first.max(b_first);
            let high = a_last.min(b_last);
            if low <= high {
                result.push(self.span(low, high));
            }
            if a_last < b_last {
                a += 1;
            } else {
                b += 1;
            }
        }

        let mut result = self.with_intervals(result);
        result.simplify()?;
        Ok(result)
    }

    /// Samples covered by either list.
    ///
    /// Repeatedly takes whichever head interval starts first (the left
    /// side on a tie) and folds it into a running span. An interval that
    /// overlaps or touches the running span extends it; otherwise the
    /// running span is emitted and a new one starts. If either side is
    /// empty the other side is returned as-is.
    pub fn union(&self, other: &Self) -> Result<Self, IntervalError> {
        self.timestamps.check_compatible(&other.timestamps, "union")?;
        if self.is_empty() {
            return Ok(self.with_intervals(other.intervals.clone()));
        }
        if other.is_empty() {
            return Ok(self.clone());
        }

        let mut result = Vec::new();
        let mut current: Option<(usize, usize)> = None;
        let mut lhs = self.intervals.iter().peekable();
        let mut rhs = other.intervals.iter().peekable();
        loop {
            let take_left = match (lhs.peek(), rhs.peek()) {
                (Some(l), Some(r)) => l.first()? <= r.first()?,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_left { lhs.next() } else { rhs.next() };
            let Some(next) = next else {
                break;
            };
            let (next_first, next_last) = next.sample_bounds()?;
            current = match current {
                Some((first, last)) if next_first <= last + 1 => Some((first, last.max(next_last))),
                Some((first, last)) => {
                    result.push(self.span(first, last));
                    Some((next_first, next_last))
                }
                None => Some((next_first, next_last)),
            };
        }
        if let Some((first, last)) = current {
            result.push(self.span(first, last));
        }
        Ok(self.with_intervals(result))
    }
}

fn resolve(timestamps: &Timestamps, first: usize, last: usize) -> Interval {
    Interval::resolved(timestamps[first], timestamps[last], first, last)
}

fn check_span(timestamps: &Timestamps, first: usize, last: usize) -> Result<(), IntervalError> {
    if last < first {
        return Err(IntervalError::InvertedSpan { first, last });
    }
    if last >= timestamps.len() {
        return Err(IntervalError::SampleOutOfRange {
            index: last,
            len: timestamps.len(),
        });
    }
    Ok(())
}

fn check_order(prev_last: Option<usize>, first: usize, index: usize) -> Result<(), IntervalError> {
    match prev_last {
        Some(prev) if first <= prev => Err(IntervalError::Unordered { index }),
        _ => Ok(()),
    }
}

impl PartialEq for IntervalList {
    /// Lists are equal when they hold the same number of equal intervals
    /// over timestamp arrays of the same length with matching endpoints.
    fn eq(&self, other: &Self) -> bool {
        self.intervals.len() == other.intervals.len()
            && self
                .timestamps
                .check_compatible(&other.timestamps, "compare")
                .is_ok()
            && self.intervals == other.intervals
    }
}

impl Index<usize> for IntervalList {
    type Output = Interval;

    fn index(&self, index: usize) -> &Interval {
        &self.intervals[index]
    }
}

impl<'a> IntoIterator for &'a IntervalList {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Not for &IntervalList {
    type Output = Result<IntervalList, IntervalError>;

    fn not(self) -> Self::Output {
        self.complement()
    }
}

impl BitAnd for &IntervalList {
    type Output = Result<IntervalList, IntervalError>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersect(rhs)
    }
}

impl BitOr for &IntervalList {
    type Output = Result<IntervalList, IntervalError>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for IntervalList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{iv}")?;
        }
        write!(f, "]")
    }
}
