//! Notify-based store watching.

use std::collections::HashSet;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{
    new_debouncer, DebounceEventResult, DebouncedEvent, Debouncer, RecommendedCache,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use slate_core::{ChangeNotifier, Error, Result, StateStore, StoreChange};
use slate_store::{key_for_path, FileStore};

/// Default debounce window for file system events.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Buffered changes per subscriber.
const CHANGE_CAPACITY: usize = 64;

/// Watches a [`FileStore`] root and fans out foreign mutations as
/// [`StoreChange`] notifications.
///
/// Events caused by the store's own writes are recognized through its echo
/// ledger and dropped, so subscribers only hear about mutations made by other
/// processes. Entry content is re-read when the event fires; after
/// debouncing, the event kind alone does not tell a rewrite from a removal.
///
/// Watching stops when the watcher is dropped.
pub struct StoreWatcher {
    store: FileStore,
    changes_tx: broadcast::Sender<StoreChange>,
    // Held to keep the underlying watch alive.
    _debouncer: Mutex<Debouncer<RecommendedWatcher, RecommendedCache>>,
}

impl StoreWatcher {
    /// Watch `store`'s root with the default debounce window.
    pub fn new(store: FileStore) -> Result<Self> {
        Self::with_debounce(store, DEFAULT_DEBOUNCE)
    }

    /// Watch `store`'s root, coalescing bursts of events within `debounce`.
    pub fn with_debounce(store: FileStore, debounce: Duration) -> Result<Self> {
        let (changes_tx, _) = broadcast::channel(CHANGE_CAPACITY);
        let tx = changes_tx.clone();
        let ledger = store.clone();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let mut handled = HashSet::new();
                    for event in events {
                        forward_event(&ledger, &tx, event, &mut handled);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        warn!(error = %error, "store watch error");
                    }
                }
            }
        })
        .map_err(|err| Error::Subscription(format!("failed to create store watcher: {err}")))?;

        debouncer
            .watch(store.root(), RecursiveMode::NonRecursive)
            .map_err(|err| {
                Error::Subscription(format!(
                    "failed to watch {}: {err}",
                    store.root().display()
                ))
            })?;

        info!(root = %store.root().display(), "store watcher started");
        Ok(Self {
            store,
            changes_tx,
            _debouncer: Mutex::new(debouncer),
        })
    }

    /// The store being watched.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Number of live change subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.changes_tx.receiver_count()
    }
}

impl ChangeNotifier for StoreWatcher {
    fn changes(&self) -> broadcast::Receiver<StoreChange> {
        self.changes_tx.subscribe()
    }
}

/// Translate one debounced event into change notifications, dropping echoes
/// of the store's own writes. `handled` keeps one notification per key per
/// debounce batch.
fn forward_event(
    store: &FileStore,
    tx: &broadcast::Sender<StoreChange>,
    event: DebouncedEvent,
    handled: &mut HashSet<String>,
) {
    for path in &event.event.paths {
        let Some(key) = key_for_path(path) else {
            continue;
        };
        if !handled.insert(key.clone()) {
            continue;
        }

        let observed = match store.get(&key) {
            Ok(observed) => observed,
            Err(err) => {
                warn!(key = %key, error = %err, "failed to read changed entry");
                continue;
            }
        };

        if store.consume_echo(&key, observed.as_deref()) {
            debug!(key = %key, "dropped own write echo");
            continue;
        }

        debug!(key = %key, removed = observed.is_none(), "store entry changed");
        let change = match observed {
            Some(text) => StoreChange::updated(key, text),
            None => StoreChange::removed(key),
        };
        let _ = tx.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_watcher_starts_on_store_root() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let watcher = StoreWatcher::new(store).unwrap();
        assert_eq!(watcher.subscriber_count(), 0);

        let _rx = watcher.changes();
        assert_eq!(watcher.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_watcher_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        std::fs::remove_dir_all(dir.path()).unwrap();

        let result = StoreWatcher::new(store);
        assert!(matches!(result, Err(Error::Subscription(_))));
    }
}
