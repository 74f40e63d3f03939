//! Same-process update bus.
//!
//! When a slot commits a new value it announces the change on a [`SlotBus`]
//! so sibling slots bound to the same key in the same process converge
//! immediately instead of waiting for a reconciliation tick. The bus is an
//! explicit handle passed to each slot at bind time; there is no process
//! global.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default capacity of the bus channel.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Identity of one bound slot, used to recognize its own bus echoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginId(Uuid);

impl OriginId {
    /// Mint a fresh identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OriginId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OriginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed value announced on the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotUpdate {
    /// Key the value was committed under.
    pub key: String,
    /// The committed value, already in its serialized form.
    pub value: serde_json::Value,
    /// Identity of the slot that committed it.
    pub origin: OriginId,
}

/// Broadcast handle for same-process slot updates.
///
/// Cloning is cheap and every clone publishes into the same channel. Updates
/// published while no subscriber is listening are dropped.
#[derive(Debug, Clone)]
pub struct SlotBus {
    tx: broadcast::Sender<SlotUpdate>,
}

impl SlotBus {
    /// Create a bus that buffers up to `capacity` in-flight updates per
    /// subscriber. Slow subscribers that fall further behind see
    /// [`broadcast::error::RecvError::Lagged`] and miss the skipped updates.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Announce a committed value to all current subscribers.
    pub fn publish(&self, update: SlotUpdate) {
        // Send fails only when there are no subscribers.
        let _ = self.tx.send(update);
    }

    /// Subscribe to updates published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SlotUpdate> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SlotBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = SlotBus::default();
        let mut rx = bus.subscribe();

        let origin = OriginId::new();
        bus.publish(SlotUpdate {
            key: "counter".to_string(),
            value: json!(3),
            origin,
        });

        let update = rx.recv().await.unwrap();
        assert_eq!(update.key, "counter");
        assert_eq!(update.value, json!(3));
        assert_eq!(update.origin, origin);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let bus = SlotBus::default();
        bus.publish(SlotUpdate {
            key: "counter".to_string(),
            value: json!(1),
            origin: OriginId::new(),
        });

        // A subscriber registered afterwards sees nothing.
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_origin_ids_are_distinct() {
        assert_ne!(OriginId::new(), OriginId::new());
    }
}
