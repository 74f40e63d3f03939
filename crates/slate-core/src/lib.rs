//! # Slate Core
//!
//! Core types for keyed persistent values that stay synchronized across
//! observers, processes, and storage backends.
//!
//! ## Synchronization model
//!
//! A [`Slot`] mirrors one typed value between memory and a durable
//! [`StateStore`] entry, and keeps four views of it in agreement:
//!
//! ```text
//! ┌────────────┐  set()   ┌────────────┐  write   ┌────────────┐
//! │ Observers  │◀─────────│    Slot    │─────────▶│ StateStore │
//! │ (watch rx) │          │            │          │  (text)    │
//! └────────────┘          └────────────┘          └────────────┘
//!                            │      ▲ ▲
//!                  publish   │      │ │ StoreChange (other processes)
//!                            ▼      │ │ + reconciliation ticks
//!                         ┌────────────┐
//!                         │  SlotBus   │  (same-process siblings)
//!                         └────────────┘
//! ```
//!
//! Commits apply locally first, then to the store, then announce on the bus.
//! Mutations made elsewhere arrive through a [`ChangeNotifier`] when one is
//! bound, with periodic reconciliation against the store as the fallback.
//!
//! Storage backends and change notifiers live in their own crates; this crate
//! only ships the in-memory [`MemoryStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod bus;
pub mod changes;
pub mod error;
pub mod slot;
pub mod store;

pub use bus::{OriginId, SlotBus, SlotUpdate, DEFAULT_BUS_CAPACITY};
pub use changes::{ChangeNotifier, StoreChange};
pub use error::{Error, Result};
pub use slot::{Slot, SlotBuilder, DEFAULT_POLL_INTERVAL};
pub use store::{MemoryStore, StateStore};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::{
        ChangeNotifier, Error, MemoryStore, Result, Slot, SlotBuilder, SlotBus, SlotUpdate,
        StateStore, StoreChange,
    };
}
