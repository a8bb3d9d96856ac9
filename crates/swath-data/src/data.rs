//! The distributed observation collection.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;
use swath_comm::{log, Comm};
use swath_core::{Matcher, Observation, Value};

use crate::error::DataError;
use crate::metadata::Metadata;

/// A shared handle to one observation record.
///
/// Collections and their views hold clones of the same handle; records
/// are never copied.
pub type ObsRef = Rc<RefCell<dyn Observation>>;

/// This process's share of a distributed set of observations.
///
/// Each process group holds its own list of observations, bound to the
/// group layout in [`Comm`]. The collection also carries a [`Metadata`]
/// mapping for collection-wide values.
///
/// A collection is either an owner or a view. An owner clears its
/// records when it is cleared or dropped. A view, as returned by
/// [`split`](Self::split) and [`select`](Self::select), references its
/// source's records and shares its source's metadata; clearing a view
/// only empties its own list.
pub struct Data {
    comm: Comm,
    view: bool,
    obs: Vec<ObsRef>,
    meta: Metadata,
}

impl Data {
    /// An empty owning collection over `comm`.
    pub fn new(comm: Comm) -> Self {
        Self {
            comm,
            view: false,
            obs: Vec::new(),
            meta: Metadata::new(),
        }
    }

    /// An empty view sharing this collection's communicator and metadata.
    pub(crate) fn empty_view(&self) -> Self {
        Self {
            comm: self.comm.clone(),
            view: true,
            obs: Vec::new(),
            meta: self.meta.clone(),
        }
    }

    /// The process layout the data is distributed over.
    pub fn comm(&self) -> &Comm {
        &self.comm
    }

    /// Returns `true` if this collection references another's records.
    pub fn is_view(&self) -> bool {
        self.view
    }

    /// The local observations, in insertion order.
    pub fn obs(&self) -> &[ObsRef] {
        &self.obs
    }

    /// Number of local observations.
    pub fn len(&self) -> usize {
        self.obs.len()
    }

    /// Returns `true` if there are no local observations.
    pub fn is_empty(&self) -> bool {
        self.obs.is_empty()
    }

    /// The collection-wide metadata.
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Append an observation and return its shared handle.
    pub fn push<O: Observation + 'static>(&mut self, ob: O) -> ObsRef {
        let handle: ObsRef = Rc::new(RefCell::new(ob));
        self.obs.push(Rc::clone(&handle));
        handle
    }

    /// Append an existing observation handle.
    pub fn push_ref(&mut self, ob: ObsRef) {
        self.obs.push(ob);
    }

    /// Empty the observation list.
    ///
    /// An owner clears every record first; a view leaves records alone.
    /// Calling this on an empty collection does nothing.
    ///
    /// A record that is borrowed elsewhere while this runs cannot be
    /// cleared. It is skipped with a warning and still removed from the
    /// list, so its contents live on with whoever holds the other handle.
    pub fn clear(&mut self) {
        if !self.view {
            for (index, ob) in self.obs.iter().enumerate() {
                match ob.try_borrow_mut() {
                    Ok(mut ob) => ob.clear(),
                    Err(_) => tracing::warn!(index, "observation is borrowed, skipping clear"),
                }
            }
        }
        self.obs.clear();
    }

    /// Every detector held locally by any observation, in first-seen
    /// order without duplicates.
    pub fn all_local_detectors(&self, selection: Option<&Matcher>) -> Vec<String> {
        let mut all = IndexSet::new();
        for ob in &self.obs {
            all.extend(ob.borrow().select_local_detectors(selection));
        }
        all.into_iter().collect()
    }

    /// Verify that every process of the group holds the same `value` for
    /// `key` of observation `index`.
    ///
    /// Collective over the group communicator.
    pub(crate) fn check_consistent(
        &self,
        index: usize,
        key: &str,
        value: &Value,
    ) -> Result<(), DataError> {
        let values = self.comm.allgather_group(value.clone())?;
        if values.iter().all(|v| v == value) {
            return Ok(());
        }
        let err = DataError::InconsistentValue {
            index,
            key: key.to_string(),
        };
        log::error_rank(self.comm.comm_group(), &err);
        Err(err)
    }

    /// Report that observation `index` lacks `field` and build the error.
    pub(crate) fn missing_field(&self, index: usize, field: impl Into<String>) -> DataError {
        let err = DataError::MissingField {
            index,
            field: field.into(),
        };
        log::error_rank(self.comm.comm_group(), &err);
        err
    }
}

impl Drop for Data {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Data with {} Observations:", self.obs.len())?;
        for ob in &self.obs {
            writeln!(f, "{}", ob.borrow())?;
        }
        writeln!(f, "Metadata:")?;
        write!(f, "{}\n>", self.meta)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("comm", &self.comm)
            .field("view", &self.view)
            .field("n_obs", &self.obs.len())
            .field("meta", &self.meta)
            .finish()
    }
}
