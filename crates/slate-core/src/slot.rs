//! Synchronized persistent values.
//!
//! A [`Slot`] binds one typed value to a string key in a durable store and
//! keeps every copy of that value in agreement:
//!
//! - the in-memory value observable through [`Slot::get`] and
//!   [`Slot::subscribe`],
//! - the serialized text held by the store,
//! - sibling slots bound to the same key in the same process, reached through
//!   the [`SlotBus`],
//! - other processes, whose writes arrive through an optional
//!   [`ChangeNotifier`] and, failing that, through periodic reconciliation
//!   against the store.
//!
//! [`Slot::set`] commits in a fixed order: local observers first, then the
//! durable store, then the bus announcement. Remote mutations are adopted at
//! most once per distinct stored text, so repeated reconciliation ticks over
//! an unchanged store never re-notify observers.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::bus::{OriginId, SlotBus, SlotUpdate};
use crate::changes::{ChangeNotifier, StoreChange};
use crate::error::{Error, Result};
use crate::store::StateStore;

/// How often a slot reconciles against the store when no notification has
/// arrived.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A typed value mirrored between memory and a durable store.
///
/// Dropping the slot (or calling [`Slot::close`]) releases its bus
/// subscription, its change subscription, and its reconciliation timer.
pub struct Slot<T> {
    key: String,
    origin: OriginId,
    value: Arc<watch::Sender<T>>,
    /// Last stored text this slot has accounted for, shared with the driver.
    seen: Arc<Mutex<Option<String>>>,
    store: Arc<dyn StateStore>,
    bus: SlotBus,
    notifier: Option<Arc<dyn ChangeNotifier>>,
    poll_every: Duration,
    driver: Option<JoinHandle<()>>,
}

impl<T> std::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("key", &self.key)
            .field("origin", &self.origin)
            .field("poll_every", &self.poll_every)
            .finish()
    }
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Bind `key` with default options. See [`SlotBuilder`] for the knobs.
    pub async fn bind(
        key: impl Into<String>,
        initial: T,
        store: Arc<dyn StateStore>,
        bus: SlotBus,
    ) -> Result<Self> {
        SlotBuilder::new(key, initial, store, bus).bind().await
    }

    /// Start configuring a slot binding.
    pub fn builder(
        key: impl Into<String>,
        initial: T,
        store: Arc<dyn StateStore>,
        bus: SlotBus,
    ) -> SlotBuilder<T> {
        SlotBuilder::new(key, initial, store, bus)
    }

    /// The key this slot is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// This binding's identity on the bus.
    pub fn origin(&self) -> OriginId {
        self.origin
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Watch the value. The receiver resolves whenever a new value is
    /// committed locally or adopted from another context.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.value.subscribe()
    }

    /// Commit a new value.
    ///
    /// Observers of this slot are notified first, then the serialized text is
    /// written to the store, then the update is announced on the bus. A store
    /// write failure is logged and the commit continues; the value stays
    /// visible in memory and to siblings, only durability is lost until the
    /// next successful write.
    pub fn set(&self, value: T) -> Result<()> {
        let json = serde_json::to_value(&value).map_err(|err| Error::serialize(&self.key, err))?;
        let text = json.to_string();

        self.value.send_replace(value);
        {
            let mut seen = self.seen.lock();
            *seen = Some(text.clone());
            if let Err(err) = self.store.set(&self.key, &text) {
                warn!(
                    key = %self.key,
                    error = %err,
                    "store write failed, value kept in memory only"
                );
            }
        }

        self.bus.publish(SlotUpdate {
            key: self.key.clone(),
            value: json,
            origin: self.origin,
        });
        Ok(())
    }

    /// Re-bind this slot to a different key.
    ///
    /// The old key's subscriptions and timer are released first, then the
    /// slot re-initializes exactly as a fresh bind would: the new key's
    /// stored entry is adopted if present, `initial` is used if absent or
    /// unreadable, and a stored entry that fails to parse returns
    /// [`Error::Parse`] while the slot keeps its previous value.
    /// Synchronization resumes under the new key either way.
    pub async fn rebind(&mut self, key: impl Into<String>, initial: T) -> Result<()> {
        self.release_driver().await;
        self.key = key.into();

        let mut outcome = Ok(());
        match self.store.get(&self.key) {
            Ok(Some(text)) => match serde_json::from_str::<T>(&text) {
                Ok(value) => {
                    *self.seen.lock() = Some(text);
                    self.value.send_replace(value);
                }
                Err(err) => {
                    *self.seen.lock() = Some(text);
                    outcome = Err(Error::parse(&self.key, err));
                }
            },
            Ok(None) => {
                *self.seen.lock() = None;
                self.value.send_replace(initial);
            }
            Err(err) => {
                warn!(
                    key = %self.key,
                    error = %err,
                    "store read failed during rebind, starting from the initial value"
                );
                *self.seen.lock() = None;
                self.value.send_replace(initial);
            }
        }

        self.driver = Some(self.spawn_driver());
        outcome
    }

    /// Release the slot's subscriptions and reconciliation timer.
    ///
    /// After this returns no further adoption can occur; observers keep the
    /// last value they saw.
    pub async fn close(mut self) {
        self.release_driver().await;
    }

    /// The configured reconciliation interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_every
    }

    async fn release_driver(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
            let _ = driver.await;
        }
    }

    fn spawn_driver(&self) -> JoinHandle<()> {
        let driver = SlotDriver {
            key: self.key.clone(),
            origin: self.origin,
            value: Arc::clone(&self.value),
            seen: Arc::clone(&self.seen),
            store: Arc::clone(&self.store),
            poll_every: self.poll_every,
        };
        let bus_rx = self.bus.subscribe();
        let changes_rx = self.notifier.as_ref().map(|n| n.changes());
        tokio::spawn(driver.run(bus_rx, changes_rx))
    }
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

/// Configures and binds a [`Slot`].
pub struct SlotBuilder<T> {
    key: String,
    initial: T,
    store: Arc<dyn StateStore>,
    bus: SlotBus,
    notifier: Option<Arc<dyn ChangeNotifier>>,
    poll_every: Duration,
    recover: bool,
}

impl<T> SlotBuilder<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Bind `key` against `store`, announcing updates on `bus`. `initial` is
    /// used when the store has no entry for the key.
    pub fn new(
        key: impl Into<String>,
        initial: T,
        store: Arc<dyn StateStore>,
        bus: SlotBus,
    ) -> Self {
        Self {
            key: key.into(),
            initial,
            store,
            bus,
            notifier: None,
            poll_every: DEFAULT_POLL_INTERVAL,
            recover: false,
        }
    }

    /// Adopt store mutations from `notifier` as they are observed instead of
    /// waiting for the next reconciliation tick.
    pub fn with_notifier(mut self, notifier: Arc<dyn ChangeNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Override the reconciliation interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_every = interval;
        self
    }

    /// Fall back to the initial value (with a warning) when the stored entry
    /// fails to parse at bind time, instead of returning [`Error::Parse`].
    pub fn recover_with_initial(mut self) -> Self {
        self.recover = true;
        self
    }

    /// Read the key's entry, settle the starting value, and start the
    /// synchronization driver.
    ///
    /// The store is left unwritten until the first [`Slot::set`]; binding a
    /// key with no entry only settles the in-memory value.
    pub async fn bind(self) -> Result<Slot<T>> {
        let SlotBuilder {
            key,
            initial,
            store,
            bus,
            notifier,
            poll_every,
            recover,
        } = self;

        let mut seen = None;
        let value = match store.get(&key) {
            Ok(Some(text)) => match serde_json::from_str::<T>(&text) {
                Ok(value) => {
                    seen = Some(text);
                    value
                }
                Err(err) if recover => {
                    warn!(
                        key = %key,
                        error = %err,
                        "stored entry failed to parse, starting from the initial value"
                    );
                    seen = Some(text);
                    initial
                }
                Err(err) => return Err(Error::parse(key, err)),
            },
            Ok(None) => initial,
            Err(err) => {
                warn!(
                    key = %key,
                    error = %err,
                    "store read failed during bind, starting from the initial value"
                );
                initial
            }
        };

        let (tx, _rx) = watch::channel(value);
        let mut slot = Slot {
            key,
            origin: OriginId::new(),
            value: Arc::new(tx),
            seen: Arc::new(Mutex::new(seen)),
            store,
            bus,
            notifier,
            poll_every,
            driver: None,
        };
        slot.driver = Some(slot.spawn_driver());
        debug!(key = %slot.key, origin = %slot.origin, "slot bound");
        Ok(slot)
    }
}

/// Background half of a slot: folds bus updates, change notifications, and
/// reconciliation ticks into the shared value.
struct SlotDriver<T> {
    key: String,
    origin: OriginId,
    value: Arc<watch::Sender<T>>,
    seen: Arc<Mutex<Option<String>>>,
    store: Arc<dyn StateStore>,
    poll_every: Duration,
}

impl<T> SlotDriver<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn run(
        self,
        mut bus_rx: broadcast::Receiver<SlotUpdate>,
        changes_rx: Option<broadcast::Receiver<StoreChange>>,
    ) {
        // The first tick fires one interval from now, not immediately; bind
        // already settled the starting value.
        let mut poll = time::interval_at(Instant::now() + self.poll_every, self.poll_every);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let (mut changes_rx, mut notifications_live) = match changes_rx {
            Some(rx) => (rx, true),
            None => {
                let (_tx, rx) = broadcast::channel(1);
                (rx, false)
            }
        };
        let mut bus_live = true;

        loop {
            tokio::select! {
                update = bus_rx.recv(), if bus_live => match update {
                    Ok(update) if update.key == self.key => self.apply_update(update),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(key = %self.key, skipped, "bus receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        bus_live = false;
                    }
                },
                change = changes_rx.recv(), if notifications_live => match change {
                    Ok(change) if change.key == self.key => self.apply_change(change),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(key = %self.key, skipped, "change receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(key = %self.key, "change notifier closed, polling only");
                        notifications_live = false;
                    }
                },
                _ = poll.tick() => self.reconcile(),
            }
        }
    }

    /// Handle a same-process bus announcement.
    fn apply_update(&self, update: SlotUpdate) {
        if update.origin == self.origin {
            // Own echo; set() already applied it.
            return;
        }
        self.adopt_text(update.value.to_string(), "bus");
    }

    /// Handle an observed store mutation from another context.
    fn apply_change(&self, change: StoreChange) {
        match change.new_value {
            Some(text) => self.adopt_text(text, "notification"),
            None => {
                debug!(key = %self.key, "entry removed externally, keeping last value");
            }
        }
    }

    /// Compare the store's text against the last accounted text and adopt it
    /// if it is new.
    fn reconcile(&self) {
        let mut seen = self.seen.lock();
        match self.store.get(&self.key) {
            Ok(Some(text)) => self.adopt_locked(&mut seen, text, "poll"),
            Ok(None) => {}
            Err(err) => {
                warn!(key = %self.key, error = %err, "store read failed during reconciliation");
            }
        }
    }

    fn adopt_text(&self, text: String, via: &'static str) {
        let mut seen = self.seen.lock();
        self.adopt_locked(&mut seen, text, via);
    }

    fn adopt_locked(&self, seen: &mut Option<String>, text: String, via: &'static str) {
        if seen.as_deref() == Some(text.as_str()) {
            return;
        }
        match serde_json::from_str::<T>(&text) {
            Ok(value) => {
                *seen = Some(text);
                self.value.send_replace(value);
                debug!(key = %self.key, via, "adopted external value");
            }
            Err(err) => {
                // Keep the last good value, but account for the text so an
                // unchanged store does not re-warn every tick.
                warn!(
                    key = %self.key,
                    via,
                    error = %err,
                    "stored text failed to parse, keeping last value"
                );
                *seen = Some(text);
            }
        }
    }
}
