//! Collection-wide metadata shared between a collection and its views.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use swath_core::Value;

/// A handle to an insertion-ordered key/value mapping.
///
/// Cloning the handle does not copy the mapping: every clone reads and
/// writes the same entries. Views produced by
/// [`Data::split`](crate::Data::split) and
/// [`Data::select`](crate::Data::select) hold a clone of their source's
/// handle, so metadata written through any of them is visible through
/// all of them.
#[derive(Clone, Default)]
pub struct Metadata {
    inner: Rc<RefCell<IndexMap<String, Value>>>,
}

impl Metadata {
    /// An empty mapping with a fresh handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().get(key).cloned()
    }

    /// Store `value` under `key`, returning the previous value.
    ///
    /// A new key is appended; an existing key keeps its position.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.borrow_mut().insert(key.into(), value.into())
    }

    /// Remove `key`, returning its value. Remaining keys keep their order.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.borrow_mut().shift_remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Returns `true` if both handles refer to the same mapping.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.borrow().iter()).finish()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.inner.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k:?}: {v}")?;
        }
        f.write_str("}")
    }
}
