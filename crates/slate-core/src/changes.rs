//! Cross-context change notifications.
//!
//! A [`ChangeNotifier`] reports mutations made to the durable store by other
//! contexts (other processes, or tool writes that bypass the bus). Notifiers
//! never report a context's own writes back to it; slots bound in the writing
//! context converge through the [`SlotBus`](crate::SlotBus) instead. The
//! notifier trait lives here so slots can consume notifications without
//! depending on any particular backend; the file-watching implementation is
//! in its own crate.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// An observed mutation of one store entry.
#[derive(Debug, Clone)]
pub struct StoreChange {
    /// Key whose entry changed.
    pub key: String,
    /// The entry's new text, or `None` when the entry was removed.
    pub new_value: Option<String>,
    /// When the change was observed.
    pub observed_at: DateTime<Utc>,
}

impl StoreChange {
    /// Describe a written or updated entry.
    pub fn updated(key: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: Some(new_value.into()),
            observed_at: Utc::now(),
        }
    }

    /// Describe a removed entry.
    pub fn removed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: None,
            observed_at: Utc::now(),
        }
    }
}

/// Source of [`StoreChange`] notifications.
///
/// Implementations watch the durable store by whatever means the backend
/// offers and fan observed changes out to every subscriber. Slots treat the
/// notification stream as best-effort; periodic reconciliation against the
/// store covers missed or dropped notifications.
pub trait ChangeNotifier: Send + Sync {
    /// Subscribe to changes observed after this call.
    fn changes(&self) -> broadcast::Receiver<StoreChange>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updated_change_carries_text() {
        let change = StoreChange::updated("counter", "10");
        assert_eq!(change.key, "counter");
        assert_eq!(change.new_value.as_deref(), Some("10"));
    }

    #[test]
    fn test_removed_change_has_no_text() {
        let change = StoreChange::removed("counter");
        assert_eq!(change.key, "counter");
        assert!(change.new_value.is_none());
    }
}
