//! # Slate Store
//!
//! File-backed persistence for slate slots: one text entry per key under a
//! root directory, written atomically, with an echo ledger that lets a
//! watcher over the same root distinguish this process's writes from foreign
//! ones.
//!
//! [`OpenedStore`] wraps the open step with the degradation policy: when the
//! root is unusable the process runs on an in-memory store instead of
//! failing.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod file;
mod keys;
mod opened;

pub use file::FileStore;
pub use keys::{entry_file_name, entry_path, key_for_path, ENTRY_EXTENSION};
pub use opened::OpenedStore;
