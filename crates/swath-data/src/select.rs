//! Selecting a subset of a collection as a view.

use std::rc::Rc;

use swath_core::{Matcher, ObsUid, ValueMatch};

use crate::data::Data;
use crate::error::DataError;

/// Criteria for [`Data::select`], combined with logical OR.
///
/// ```
/// use swath_data::Selection;
///
/// let sel = Selection::new().name("scan_0").key("band").value("f090");
/// assert!(sel.validate().is_ok());
/// assert!(Selection::new().value("f090").validate().is_err());
/// ```
#[derive(Debug, Default)]
pub struct Selection {
    index: Option<usize>,
    name: Option<Matcher>,
    uid: Option<ObsUid>,
    key: Option<String>,
    value: Option<ValueMatch>,
}

impl Selection {
    /// A selection matching nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the observation at this position.
    pub fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Match observations whose name matches.
    pub fn name(mut self, name: impl Into<Matcher>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Match the observation with this uid.
    pub fn uid(mut self, uid: impl Into<ObsUid>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Match observations carrying this key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Narrow the key criterion to observations whose value matches.
    /// Requires [`key`](Self::key).
    pub fn value(mut self, value: impl Into<ValueMatch>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Reject a value criterion without a key.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.value.is_some() && self.key.is_none() {
            return Err(DataError::ValueWithoutKey);
        }
        Ok(())
    }
}

impl Data {
    /// A view of the observations matching any criterion of `sel`.
    ///
    /// Matching observations keep their source order and appear once
    /// each, however many criteria they match. The view shares this
    /// collection's metadata.
    ///
    /// With a key criterion this is collective over the group
    /// communicator: every observation carrying the key is checked for
    /// the same value on every process of the group, whether or not it
    /// has already matched another criterion.
    pub fn select(&self, sel: &Selection) -> Result<Data, DataError> {
        sel.validate()?;
        tracing::debug!(selection = ?sel, n_obs = self.len(), "select");
        let mut out = self.empty_view();
        for (index, ob) in self.obs().iter().enumerate() {
            let o = ob.borrow();
            let mut hit = sel.index == Some(index);
            if let (Some(m), Some(name)) = (&sel.name, o.name()) {
                hit |= m.matches(name);
            }
            if let (Some(uid), Some(own)) = (sel.uid, o.uid()) {
                hit |= uid == own;
            }
            if let Some(key) = &sel.key {
                if let Some(v) = o.get(key) {
                    self.check_consistent(index, key, v)?;
                    hit |= sel.value.as_ref().is_none_or(|m| m.matches(v));
                }
            }
            if hit {
                out.push_ref(Rc::clone(ob));
            }
        }
        Ok(out)
    }
}
