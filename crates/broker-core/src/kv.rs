//! Thread-safe key-value store with atomic get-and-delete.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// A thread-safe map with atomic get-and-delete, used for the in-flight
/// message set.
pub struct KvStore<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for KvStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KvStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Unconditional upsert.
    pub fn store(&self, key: K, value: V) {
        self.entries.lock().unwrap().insert(key, value);
    }

    /// Look up without removing.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Atomically remove and return the value for `key`. Of any concurrent
    /// contenders, exactly one sees `Some`; the rest see `None`.
    pub fn get_and_delete(&self, key: &K) -> Option<V> {
        self.entries.lock().unwrap().remove(key)
    }

    /// Idempotent; absence is not an error.
    pub fn delete(&self, key: &K) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Snapshot of all entries; may reflect any valid serial ordering of
    /// concurrent mutations.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
