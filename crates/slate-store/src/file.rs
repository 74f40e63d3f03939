//! File-backed store: one text entry per key.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use slate_core::{Error, Result, StateStore};

use crate::keys::{entry_path, key_for_path};

/// Durable [`StateStore`] keeping one text file per key under a root
/// directory.
///
/// Writes land in a temp file and are renamed into place, so readers and
/// watchers never observe a half-written entry. Each write is also recorded
/// in an echo ledger; a watcher over the same root consults the ledger
/// through [`FileStore::consume_echo`] to drop events caused by this
/// process's own writes, mirroring native change notifications that only fire
/// in other contexts.
///
/// Clones share the root and the ledger.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    echoes: Arc<Mutex<HashMap<String, Option<String>>>>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// The root is probed for writability; an unusable root yields
    /// [`Error::StoreUnavailable`] so callers can degrade to a memory store.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| {
            Error::StoreUnavailable(format!("cannot create {}: {err}", root.display()))
        })?;

        let probe = root.join(".probe");
        fs::write(&probe, b"probe").map_err(|err| {
            Error::StoreUnavailable(format!("{} is not writable: {err}", root.display()))
        })?;
        let _ = fs::remove_file(&probe);

        debug!(root = %root.display(), "file store opened");
        Ok(Self {
            root,
            echoes: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Directory the entries live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Platform default root for a named application scope.
    pub fn default_root(scope: &str) -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(scope).join("store"))
    }

    /// Report an observed entry state and check it against the ledger of this
    /// process's own writes. Returns `true` when the observation is the echo
    /// of a local write, consuming the record.
    pub fn consume_echo(&self, key: &str, observed: Option<&str>) -> bool {
        match self.echoes.lock().remove(key) {
            Some(recorded) => recorded.as_deref() == observed,
            None => false,
        }
    }

    fn entry(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(Error::Store("empty keys are not supported".to_string()));
        }
        Ok(entry_path(&self.root, key))
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry(key)?;
        let temp = path.with_extension("tmp");
        fs::write(&temp, value)?;
        fs::rename(&temp, &path)?;
        self.echoes
            .lock()
            .insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry(key)?;
        let removed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => return Err(err.into()),
        };
        if removed {
            self.echoes.lock().insert(key.to_string(), None);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for dirent in fs::read_dir(&self.root)? {
            if let Some(key) = key_for_path(&dirent?.path()) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}
