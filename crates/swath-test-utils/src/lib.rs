//! Test utilities and mock types for swath development.
//!
//! Provides timestamp ramps, a [`MockObservation`] that counts how often
//! it was cleared, and [`run_world`] for running a closure on every rank
//! of an in-process world with a ready-made [`Comm`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use swath_comm::{Comm, CommConfig, LocalWorld};
use swath_core::{Matcher, ObsUid, Observation, Value};
use swath_intervals::Timestamps;

/// `n` samples at 1 Hz starting at `t = 0`.
pub fn ramp(n: usize) -> Timestamps {
    Timestamps::uniform(0.0, 1.0, n).expect("ramp length must be non-zero")
}

/// Run `f` on every rank of a `size`-process world split into groups of
/// `group_size`, returning per-rank results in world rank order.
pub fn run_world<T, F>(size: usize, group_size: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(Comm) -> T + Sync,
{
    LocalWorld::run(size, |world| {
        let comm = Comm::new(world, &CommConfig::with_group_size(group_size))
            .expect("group_size must divide the world size");
        f(comm)
    })
}

/// Observation with settable fields that counts calls to `clear`.
///
/// The counter is shared: clone [`cleared`](Self::cleared) before moving
/// the mock into a collection to observe it afterwards.
pub struct MockObservation {
    pub name: Option<String>,
    pub uid: Option<ObsUid>,
    pub detectors: Vec<String>,
    pub n_samples: usize,
    pub values: IndexMap<String, Value>,
    pub cleared: Rc<Cell<usize>>,
}

impl MockObservation {
    pub fn new() -> Self {
        Self {
            name: None,
            uid: None,
            detectors: Vec::new(),
            n_samples: 0,
            values: IndexMap::new(),
            cleared: Rc::new(Cell::new(0)),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn clear_count(&self) -> usize {
        self.cleared.get()
    }
}

impl Default for MockObservation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MockObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Mock {}>", self.name.as_deref().unwrap_or("?"))
    }
}

impl Observation for MockObservation {
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
        self.detectors
            .iter()
            .filter(|d| selection.is_none_or(|m| m.matches(d)))
            .cloned()
            .collect()
    }

    fn n_local_samples(&self) -> usize {
        self.n_samples
    }

    fn clear(&mut self) {
        self.cleared.set(self.cleared.get() + 1);
        self.detectors.clear();
        self.values.clear();
    }
}
