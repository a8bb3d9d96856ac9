//! A concrete observation record.

use std::fmt;

use indexmap::IndexMap;
use swath_core::{Matcher, ObsUid, Observation, Value};
use swath_intervals::{IntervalError, IntervalList, Timestamps};

/// An observation holding its local detectors, sample times, keyed
/// values and named interval lists.
///
/// Interval lists attached to a record must be built over timestamps
/// compatible with the record's own.
#[derive(Clone, Debug, Default)]
pub struct Record {
    name: Option<String>,
    uid: Option<ObsUid>,
    detectors: Vec<String>,
    timestamps: Option<Timestamps>,
    values: IndexMap<String, Value>,
    intervals: IndexMap<String, IntervalList>,
}

impl Record {
    /// An empty record with no name, uid or samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the uid.
    pub fn with_uid(mut self, uid: impl Into<ObsUid>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Set the detectors held by this process.
    pub fn with_detectors<I, S>(mut self, detectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detectors = detectors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the sample times held by this process.
    pub fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Store a keyed value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a keyed value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// The record's sample times, if any.
    pub fn timestamps(&self) -> Option<&Timestamps> {
        self.timestamps.as_ref()
    }

    /// Attach an interval list under `name`, replacing any previous one.
    pub fn set_intervals(
        &mut self,
        name: impl Into<String>,
        list: IntervalList,
    ) -> Result<Option<IntervalList>, IntervalError> {
        let own = self
            .timestamps
            .as_ref()
            .ok_or_else(|| IntervalError::IncompatibleTimestamps {
                op: "attach",
                reason: "record has no timestamps".to_string(),
            })?;
        own.check_compatible(list.timestamps(), "attach")?;
        Ok(self.intervals.insert(name.into(), list))
    }

    /// The interval list stored under `name`.
    pub fn intervals(&self, name: &str) -> Option<&IntervalList> {
        self.intervals.get(name)
    }

    /// Names of the attached interval lists, in insertion order.
    pub fn interval_names(&self) -> impl Iterator<Item = &str> {
        self.intervals.keys().map(String::as_str)
    }
}

impl Observation for Record {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn uid(&self) -> Option<ObsUid> {
        self.uid
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn select_local_detectors(&self, selection: Option<&Matcher>) -> Vec<String> {
        match selection {
            None => self.detectors.clone(),
            Some(m) => self
                .detectors
                .iter()
                .filter(|d| m.matches(d))
                .cloned()
                .collect(),
        }
    }

    fn n_local_samples(&self) -> usize {
        self.timestamps.as_ref().map_or(0, Timestamps::len)
    }

    fn clear(&mut self) {
        self.detectors.clear();
        self.timestamps = None;
        self.values.clear();
        self.intervals.clear();
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Record '{}' (uid {}): {} detectors, {} samples",
            self.name.as_deref().unwrap_or("?"),
            self.uid.map_or_else(|| "?".to_string(), |u| u.to_string()),
            self.detectors.len(),
            self.n_local_samples(),
        )?;
        if !self.intervals.is_empty() {
            let names: Vec<&str> = self.interval_names().collect();
            write!(f, ", intervals [{}]", names.join(", "))?;
        }
        f.write_str(">")
    }
}
