//! Command implementations.

pub mod config;
pub mod counter;
pub mod get;
pub mod keys;
pub mod remove;
pub mod set;
pub mod tools;
pub mod watch;

use std::sync::Arc;

use tracing::warn;

use slate_core::ChangeNotifier;
use slate_store::OpenedStore;
use slate_watch::StoreWatcher;

use crate::config::CliConfig;

/// Open the configured store, degrading to memory when the root is unusable.
pub(crate) fn open_store(config: &CliConfig) -> OpenedStore {
    OpenedStore::open_or_memory(config.store_root())
}

/// Start a change watcher over the store when it is durable.
///
/// Returns `None` in memory mode or when the watcher cannot start; slots
/// then rely on their polling fallback.
pub(crate) fn start_notifier(
    opened: &OpenedStore,
    config: &CliConfig,
) -> Option<Arc<dyn ChangeNotifier>> {
    let file = opened.as_file()?;
    match StoreWatcher::with_debounce(file.clone(), config.debounce()) {
        Ok(watcher) => Some(Arc::new(watcher)),
        Err(err) => {
            warn!(error = %err, "change notification unavailable, relying on polling");
            None
        }
    }
}
