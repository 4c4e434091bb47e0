//! Process-lifetime memoization.
//!
//! Executable lookup, mime sniffing and compression probes are expensive and
//! their inputs do not change during one run. [`Memo`] is an append-only map
//! guarded by a mutex. Values are computed outside the lock, so two threads
//! racing on the same key may both compute; the last write wins. Tests can
//! pre-seed or clear a cache explicitly.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// A thread-safe compute-or-overwrite cache.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a cached value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key).cloned()
    }

    /// Return the cached value or compute and store it.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.lock().insert(key, value.clone());
        value
    }

    /// Store a value, replacing any previous one.
    pub fn seed(&self, key: K, value: V) {
        self.lock().insert(key, value);
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once() {
        let memo: Memo<&str, u32> = Memo::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            7
        };
        assert_eq!(memo.get_or_insert_with("a", compute), 7);
        assert_eq!(memo.get_or_insert_with("a", || unreachable!()), 7);
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_seed_and_clear() {
        let memo: Memo<String, Option<String>> = Memo::new();
        memo.seed("tar".into(), None);
        assert_eq!(memo.get(&"tar".to_string()), Some(None));
        memo.clear();
        assert!(memo.is_empty());
    }
}
