//! Partitioning a collection into views.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;
use swath_core::{ObsUid, Value};

use crate::data::Data;
use crate::error::DataError;

/// The criterion [`Data::split`] groups observations by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitBy {
    /// One group per observation, keyed by its position.
    Index,
    /// Group by observation name.
    Name,
    /// Group by observation uid.
    Uid,
    /// Group by the value stored under this key.
    Key(String),
}

impl SplitBy {
    /// Build a criterion from independent flags, requiring exactly one.
    pub fn from_flags(
        index: bool,
        name: bool,
        uid: bool,
        key: Option<&str>,
    ) -> Result<Self, DataError> {
        let mut candidates: SmallVec<[(&'static str, SplitBy); 4]> = SmallVec::new();
        if index {
            candidates.push(("index", Self::Index));
        }
        if name {
            candidates.push(("name", Self::Name));
        }
        if uid {
            candidates.push(("uid", Self::Uid));
        }
        if let Some(k) = key {
            candidates.push(("key", Self::Key(k.to_string())));
        }
        match candidates.len() {
            1 => Ok(candidates.remove(0).1),
            _ => Err(DataError::SplitCriteria {
                supplied: candidates.iter().map(|(label, _)| *label).collect(),
            }),
        }
    }

    fn field_name(&self) -> String {
        match self {
            Self::Index => "index".to_string(),
            Self::Name => "name".to_string(),
            Self::Uid => "uid".to_string(),
            Self::Key(k) => format!("key '{k}'"),
        }
    }
}

/// The key of one group produced by [`Data::split`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SplitKey {
    /// Position in the source collection.
    Index(usize),
    /// Observation name.
    Name(String),
    /// Observation uid.
    Uid(ObsUid),
    /// Value of the split key.
    Value(Value),
}

impl fmt::Display for SplitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
            Self::Uid(u) => write!(f, "{u}"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

impl Data {
    /// Split into views grouped by `by`.
    ///
    /// Groups appear in the order their key is first seen, and each
    /// holds its observations in source order. Every view shares this
    /// collection's metadata. Observations without the requested field
    /// are skipped, or rejected with [`DataError::MissingField`] when
    /// `require_full` is set.
    ///
    /// Splitting by key is collective over the group communicator: each
    /// observation carrying the key is checked for the same value on
    /// every process of the group, and a mismatch fails with
    /// [`DataError::InconsistentValue`].
    pub fn split(
        &self,
        by: &SplitBy,
        require_full: bool,
    ) -> Result<IndexMap<SplitKey, Data>, DataError> {
        tracing::debug!(criterion = ?by, n_obs = self.len(), "split");
        let mut groups: IndexMap<SplitKey, Data> = IndexMap::new();
        for (index, ob) in self.obs().iter().enumerate() {
            let key = {
                let o = ob.borrow();
                match by {
                    SplitBy::Index => Some(SplitKey::Index(index)),
                    SplitBy::Name => o.name().map(|n| SplitKey::Name(n.to_string())),
                    SplitBy::Uid => o.uid().map(SplitKey::Uid),
                    SplitBy::Key(k) => match o.get(k) {
                        Some(v) => {
                            self.check_consistent(index, k, v)?;
                            Some(SplitKey::Value(v.clone()))
                        }
                        None => None,
                    },
                }
            };
            let Some(key) = key else {
                if require_full {
                    return Err(self.missing_field(index, by.field_name()));
                }
                continue;
            };
            groups
                .entry(key)
                .or_insert_with(|| self.empty_view())
                .push_ref(Rc::clone(ob));
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_criterion() {
        assert_eq!(SplitBy::from_flags(true, false, false, None), Ok(SplitBy::Index));
        assert_eq!(
            SplitBy::from_flags(false, false, false, Some("band")),
            Ok(SplitBy::Key("band".to_string()))
        );
        match SplitBy::from_flags(false, false, false, None) {
            Err(DataError::SplitCriteria { supplied }) => assert!(supplied.is_empty()),
            other => panic!("expected SplitCriteria, got {other:?}"),
        }
        match SplitBy::from_flags(false, true, true, Some("k")) {
            Err(DataError::SplitCriteria { supplied }) => {
                assert_eq!(supplied.as_slice(), &["name", "uid", "key"]);
            }
            other => panic!("expected SplitCriteria, got {other:?}"),
        }
    }

    #[test]
    fn split_key_display() {
        assert_eq!(SplitKey::Index(3).to_string(), "3");
        assert_eq!(SplitKey::Name("scan".into()).to_string(), "scan");
        assert_eq!(SplitKey::Uid(ObsUid(7)).to_string(), "7");
        assert_eq!(SplitKey::Value(Value::from("x")).to_string(), "\"x\"");
    }
}
