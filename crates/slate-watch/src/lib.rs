//! # Slate Watch
//!
//! File system watching for slate stores. A [`StoreWatcher`] observes a
//! [`FileStore`](slate_store::FileStore) root through the platform's native
//! notification mechanism (via `notify`, debounced), converts entry file
//! events back into keys, and publishes [`StoreChange`]s for mutations made
//! by other processes. The store's own writes are filtered out using its echo
//! ledger.
//!
//! Slots consume the watcher through the
//! [`ChangeNotifier`](slate_core::ChangeNotifier) trait, keeping polling as
//! the fallback when no watcher is bound or events are missed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod watcher;

pub use slate_core::{ChangeNotifier, StoreChange};
pub use watcher::{StoreWatcher, DEFAULT_DEBOUNCE};
