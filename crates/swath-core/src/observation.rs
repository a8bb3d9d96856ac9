//! The observation capability trait.

use std::fmt;

use crate::id::ObsUid;
use crate::matcher::Matcher;
use crate::value::Value;

/// One logical unit of sensor data, as seen by the calling process.
///
/// An observation is usually sharded across the processes of a group:
/// each process holds a subset of detectors or samples, while name, uid
/// and keyed values describe the whole record and must agree across the
/// group. The collection layer only relies on the operations below and
/// treats the detector/sample payload as opaque.
///
/// The [`Display`](fmt::Display) output is used as the per-record
/// summary in collection reports.
pub trait Observation: fmt::Display {
    /// Human-readable name, if assigned.
    fn name(&self) -> Option<&str>;

    /// Unique identifier, if assigned.
    fn uid(&self) -> Option<ObsUid>;

    /// Look up a keyed value.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Returns `true` if `key` has a value.
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Detector identifiers held by this process, optionally filtered.
    ///
    /// Order is the record's own detector order.
    fn select_local_detectors(&self, selection: Option<&Matcher>) -> Vec<String>;

    /// Number of samples held by this process.
    fn n_local_samples(&self) -> usize;

    /// Release the record's payload.
    ///
    /// Called by the owning collection on teardown. Must be idempotent.
    fn clear(&mut self);
}
