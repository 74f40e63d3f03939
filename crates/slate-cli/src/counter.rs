//! Shared counter built on a bound slot.

use std::sync::Arc;
use std::time::Duration;

use slate_core::{ChangeNotifier, Result, Slot, SlotBus, StateStore};
use slate_tools::COUNTER_KEY;

/// An integer counter mirrored to the store under [`COUNTER_KEY`].
///
/// Every process binding the counter sees the same value: writes go through
/// the slot, so they land in the store and reach other observers through
/// change notifications or polling. A counter that has never been written
/// reads as zero.
pub struct Counter {
    slot: Slot<i64>,
}

impl Counter {
    /// Bind the counter over the given store.
    ///
    /// Unreadable stored text is treated as zero rather than refusing to
    /// bind, so a corrupted entry never locks the counter out.
    pub async fn bind(
        store: Arc<dyn StateStore>,
        bus: SlotBus,
        notifier: Option<Arc<dyn ChangeNotifier>>,
        poll_every: Duration,
    ) -> Result<Self> {
        let mut builder = Slot::builder(COUNTER_KEY, 0, store, bus)
            .with_poll_interval(poll_every)
            .recover_with_initial();
        if let Some(notifier) = notifier {
            builder = builder.with_notifier(notifier);
        }

        Ok(Self {
            slot: builder.bind().await?,
        })
    }

    /// Current counter value.
    pub fn value(&self) -> i64 {
        self.slot.get()
    }

    /// Add `by` and return the new value.
    pub fn increment(&self, by: i64) -> Result<i64> {
        let next = self.value().saturating_add(by);
        self.slot.set(next)?;
        Ok(next)
    }

    /// Subtract `by` and return the new value.
    pub fn decrement(&self, by: i64) -> Result<i64> {
        self.increment(by.saturating_neg())
    }

    /// Set the counter to an exact value.
    pub fn set(&self, value: i64) -> Result<()> {
        self.slot.set(value)
    }

    /// Reset the counter to zero.
    pub fn reset(&self) -> Result<()> {
        self.set(0)
    }

    /// Watch the counter for changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<i64> {
        self.slot.subscribe()
    }

    /// Release the counter's subscriptions and timer.
    pub async fn close(self) {
        self.slot.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_core::{MemoryStore, DEFAULT_POLL_INTERVAL};

    async fn bind_over(store: &MemoryStore, bus: &SlotBus) -> Counter {
        Counter::bind(
            Arc::new(store.clone()),
            bus.clone(),
            None,
            DEFAULT_POLL_INTERVAL,
        )
        .await
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_starts_at_zero() {
        let store = MemoryStore::new();
        let bus = SlotBus::default();
        let counter = bind_over(&store, &bus).await;

        assert_eq!(counter.value(), 0);
        counter.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_increment_and_decrement() {
        let store = MemoryStore::new();
        let bus = SlotBus::default();
        let counter = bind_over(&store, &bus).await;

        assert_eq!(counter.increment(1).unwrap(), 1);
        assert_eq!(counter.increment(4).unwrap(), 5);
        assert_eq!(counter.decrement(2).unwrap(), 3);
        assert_eq!(store.get(COUNTER_KEY).unwrap(), Some("3".to_string()));

        counter.reset().unwrap();
        assert_eq!(counter.value(), 0);
        assert_eq!(store.get(COUNTER_KEY).unwrap(), Some("0".to_string()));

        counter.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sibling_counters_converge() {
        let store = MemoryStore::new();
        let bus = SlotBus::default();
        let first = bind_over(&store, &bus).await;
        let second = bind_over(&store, &bus).await;

        first.increment(7).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(second.value(), 7);

        first.close().await;
        second.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_corrupted_entry_reads_as_zero() {
        let store = MemoryStore::new();
        store.set(COUNTER_KEY, "not a number").unwrap();
        let bus = SlotBus::default();

        let counter = bind_over(&store, &bus).await;
        assert_eq!(counter.value(), 0);
        counter.close().await;
    }
}
