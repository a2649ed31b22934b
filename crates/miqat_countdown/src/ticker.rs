//! The next-prayer ticker.
//!
//! One tokio task per ticker re-derives [`NextPrayerState`] from the current
//! entries at a fixed interval and publishes it on a `watch` channel. The
//! task exists only while at least one [`NextPrayerSubscription`] is alive:
//! the first subscription spawns it and the last one to go aborts it.
//!
//! [`NextPrayerTicker::roll_over`] keeps the previous day's entries so an
//! Isha that falls after midnight is still counted down on the new date.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Duration;

use log::{debug, trace};
use miqat_core::{NextPrayerState, PrayerTimeEntry, next_prayer, pending_overnight};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::clock::{Clock, SystemClock};

/// Default publishing period.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Default)]
struct TickerSlot {
    handle: Option<JoinHandle<()>>,
    subscribers: usize,
}

struct Inner {
    clock: Arc<dyn Clock>,
    entries: RwLock<Vec<PrayerTimeEntry>>,
    /// Previous day's entries, consulted before `entries` after a roll-over.
    yesterday: RwLock<Vec<PrayerTimeEntry>>,
    state: watch::Sender<NextPrayerState>,
    slot: Mutex<TickerSlot>,
    tick_interval: Duration,
}

impl Inner {
    fn slot(&self) -> MutexGuard<'_, TickerSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn derive(&self) -> NextPrayerState {
        let now = self.clock.now();
        let yesterday = self.yesterday.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(state) = pending_overnight(&yesterday, now) {
            return state;
        }
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        next_prayer(&entries, now)
    }

    fn publish(&self) {
        let next = self.derive();
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                trace!("next prayer: {} in {}", next.name, next.time_remaining);
                *current = next;
                true
            }
        });
    }

    fn release(&self) {
        let mut slot = self.slot();
        slot.subscribers = slot.subscribers.saturating_sub(1);
        if slot.subscribers == 0 {
            if let Some(handle) = slot.handle.take() {
                debug!("last subscriber gone, stopping next-prayer ticker");
                handle.abort();
            }
        }
    }
}

fn spawn_ticker(inner: &Arc<Inner>) -> JoinHandle<()> {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    let tick_interval = inner.tick_interval;
    tokio::spawn(async move {
        let mut interval = time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match weak.upgrade() {
                Some(inner) => inner.publish(),
                None => break,
            }
        }
    })
}

/// Publishes the next prayer for a list of entries at a fixed rate.
///
/// Cloning yields another handle to the same ticker.
#[derive(Clone)]
pub struct NextPrayerTicker {
    inner: Arc<Inner>,
}

impl NextPrayerTicker {
    /// Ticker over `entries` reading the host clock once a second.
    pub fn new(entries: Vec<PrayerTimeEntry>) -> Self {
        Self::with_clock(entries, SystemClock, TICK_INTERVAL)
    }

    pub fn with_clock(
        entries: Vec<PrayerTimeEntry>,
        clock: impl Clock,
        tick_interval: Duration,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        let initial = next_prayer(&entries, clock.now());
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                clock,
                entries: RwLock::new(entries),
                yesterday: RwLock::new(Vec::new()),
                state,
                slot: Mutex::new(TickerSlot::default()),
                tick_interval,
            }),
        }
    }

    /// Register a subscriber, starting the task if none is running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(&self) -> NextPrayerSubscription {
        let receiver = {
            let mut slot = self.inner.slot();
            slot.subscribers += 1;
            if slot.handle.is_none() {
                debug!("starting next-prayer ticker ({:?})", self.inner.tick_interval);
                slot.handle = Some(spawn_ticker(&self.inner));
            }
            self.inner.state.subscribe()
        };
        self.inner.publish();
        NextPrayerSubscription {
            receiver,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Swap in a recomputed list and publish the resulting state at once.
    pub fn update_entries(&self, entries: Vec<PrayerTimeEntry>) {
        *self
            .inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner) = entries;
        self.inner.publish();
    }

    /// Move to a new calendar day's entries.
    ///
    /// The replaced entries stay visible until any of their prayers placed
    /// after midnight has passed.
    pub fn roll_over(&self, entries: Vec<PrayerTimeEntry>) {
        let previous = std::mem::replace(
            &mut *self
                .inner
                .entries
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            entries,
        );
        *self
            .inner
            .yesterday
            .write()
            .unwrap_or_else(PoisonError::into_inner) = previous;
        self.inner.publish();
    }

    /// The most recently published state.
    pub fn current(&self) -> NextPrayerState {
        self.inner.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.slot().handle.is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.slot().subscribers
    }
}

/// A live view of the countdown. Dropping it unsubscribes.
pub struct NextPrayerSubscription {
    receiver: watch::Receiver<NextPrayerState>,
    inner: Arc<Inner>,
}

impl NextPrayerSubscription {
    /// The latest state, without waiting.
    pub fn current(&self) -> NextPrayerState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published change.
    pub async fn changed(&mut self) -> Option<NextPrayerState> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Stop receiving updates. Equivalent to dropping the subscription.
    pub fn cancel(self) {}
}

impl Drop for NextPrayerSubscription {
    fn drop(&mut self) {
        self.inner.release();
    }
}

/// Start a countdown over `entries` on the host clock.
///
/// The returned subscription owns the ticker; the task stops when it is
/// dropped or cancelled.
pub fn subscribe_next_prayer(entries: Vec<PrayerTimeEntry>) -> NextPrayerSubscription {
    NextPrayerTicker::new(entries).subscribe()
}
