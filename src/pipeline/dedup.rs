// src/pipeline/dedup.rs

//! First-seen-wins collection keyed by id.

use std::collections::HashSet;
use std::hash::Hash;

/// Keeps the first value inserted for each key, in insertion order.
/// Later values for a known key are dropped.
#[derive(Debug)]
pub struct FirstSeen<K, V> {
    seen: HashSet<K>,
    values: Vec<V>,
}

impl<K: Eq + Hash, V> FirstSeen<K, V> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            values: Vec::new(),
        }
    }

    /// Insert `value` unless `key` was seen before. Returns whether it was kept.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.seen.insert(key) {
            self.values.push(value);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<K: Eq + Hash, V> Default for FirstSeen<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
