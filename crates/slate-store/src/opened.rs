//! Store opening with graceful degradation.

use std::path::PathBuf;

use tracing::warn;

use slate_core::{MemoryStore, Result, StateStore};

use crate::file::FileStore;

/// A store that is durable when possible and process-local when not.
///
/// Opening never fails: when the file backend cannot be used the values
/// simply stop surviving the process, matching how slots degrade on store
/// write failures.
#[derive(Debug, Clone)]
pub enum OpenedStore {
    /// Entries persist on disk under the file store root.
    File(FileStore),
    /// Degraded mode: entries live only as long as the process.
    Memory(MemoryStore),
}

impl OpenedStore {
    /// Open a file store at `root`, degrading to memory with a warning when
    /// the root is unusable.
    pub fn open_or_memory(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        match FileStore::open(&root) {
            Ok(store) => OpenedStore::File(store),
            Err(err) => {
                warn!(
                    root = %root.display(),
                    error = %err,
                    "durable store unavailable, values will not survive this process"
                );
                OpenedStore::Memory(MemoryStore::new())
            }
        }
    }

    /// The file store, when running durable.
    pub fn as_file(&self) -> Option<&FileStore> {
        match self {
            OpenedStore::File(store) => Some(store),
            OpenedStore::Memory(_) => None,
        }
    }

    /// Whether entries survive the process.
    pub fn is_durable(&self) -> bool {
        matches!(self, OpenedStore::File(_))
    }
}

impl StateStore for OpenedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            OpenedStore::File(store) => store.get(key),
            OpenedStore::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            OpenedStore::File(store) => store.set(key, value),
            OpenedStore::Memory(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self {
            OpenedStore::File(store) => store.remove(key),
            OpenedStore::Memory(store) => store.remove(key),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        match self {
            OpenedStore::File(store) => store.keys(),
            OpenedStore::Memory(store) => store.keys(),
        }
    }
}
