//! Key/value backing for facades without a delegate

use crate::model::Value;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard};

/// Last known value of every property of one facade
#[derive(Debug, Default)]
pub struct PropertyStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl PropertyStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Last value stored for a property, `None` if it was never set
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values().get(name).cloned()
    }

    /// Store a value, returning the previous one
    pub fn set(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values().insert(name.into(), value)
    }

    /// Whether a property has been stored
    pub fn contains(&self, name: &str) -> bool {
        self.values().contains_key(name)
    }

    /// Number of stored properties
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Whether nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owned read-only copy, sorted by property name
    pub fn snapshot(&self) -> PropertySnapshot {
        PropertySnapshot(self.values().clone())
    }
}

/// Read-only view of a [`PropertyStore`] at one point in time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertySnapshot(BTreeMap<String, Value>);

impl Deref for PropertySnapshot {
    type Target = BTreeMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for PropertySnapshot {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
