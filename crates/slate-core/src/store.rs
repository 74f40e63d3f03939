//! Durable text storage abstraction.
//!
//! Slots persist their values as text under string keys. This module defines
//! the storage trait plus an in-memory implementation used for tests and as
//! the degraded mode when a durable backend cannot be opened. Durable
//! backends live in their own crates and implement [`StateStore`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Keyed text storage with synchronous access.
///
/// All values are stored as text; typed access is layered on top by
/// [`Slot`](crate::Slot). Implementations must tolerate concurrent callers.
pub trait StateStore: Send + Sync {
    /// Read the text stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous entry.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the entry under `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;

    /// List all keys with stored entries.
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory [`StateStore`].
///
/// Entries live only as long as the process. Cloning yields a handle onto the
/// same underlying map, so clones observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("counter").unwrap(), None);

        store.set("counter", "3").unwrap();
        assert_eq!(store.get("counter").unwrap(), Some("3".to_string()));

        store.set("counter", "4").unwrap();
        assert_eq!(store.get("counter").unwrap(), Some("4".to_string()));
    }

    #[test]
    fn test_memory_store_remove_missing_is_noop() {
        let store = MemoryStore::new();
        store.remove("absent").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_keys_sorted() {
        let store = MemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        store.set("c", "3").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let alias = store.clone();
        store.set("shared", "yes").unwrap();
        assert_eq!(alias.get("shared").unwrap(), Some("yes".to_string()));
    }
}
