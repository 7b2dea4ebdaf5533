// --- File: crates/slotify_gcal/src/arbiter.rs ---
//! Per-slot serialization of reservation attempts.
//!
//! The backing store has no conditional update, so two reservations of the same
//! slot could both observe `available`. Every attempt first takes the slot's
//! exclusive guard here; the read-check-write sequence runs while it is held.
//! The guarantee covers one service process.
//!
//! A write that failed without an answer (timeout, transport error) may still be
//! applied by the store later. Such a slot is marked unsettled: the next attempt
//! waits until the settle window has passed since the failure before it trusts a
//! fresh read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;

type SlotKey = (String, String);

/// How long an unanswered write is assumed to possibly land after it failed.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_secs(30);

fn key(calendar_id: &str, slot_id: &str) -> SlotKey {
    (calendar_id.to_string(), slot_id.to_string())
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Hands out one async lock per `(calendar_id, slot_id)`.
///
/// The table only holds weak references: a lock lives as long as someone holds or
/// waits on it, and its entry is pruned on the next acquisition once it is gone.
pub struct ReservationArbiter {
    locks: Mutex<HashMap<SlotKey, Weak<AsyncMutex<()>>>>,
    unsettled: Mutex<HashMap<SlotKey, Instant>>,
    settle_window: Duration,
}

impl Default for ReservationArbiter {
    fn default() -> Self {
        Self::with_settle_window(DEFAULT_SETTLE_WINDOW)
    }
}

/// Exclusive right to transition one slot. Released on drop.
pub struct SlotGuard {
    _guard: OwnedMutexGuard<()>,
}

impl ReservationArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settle_window(settle_window: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            unsettled: Mutex::new(HashMap::new()),
            settle_window,
        }
    }

    pub fn settle_window(&self) -> Duration {
        self.settle_window
    }

    fn lock_for(&self, calendar_id: &str, slot_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = relock(&self.locks);
        locks.retain(|_, weak| weak.strong_count() > 0);

        let key = key(calendar_id, slot_id);
        if let Some(existing) = locks.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(key, Arc::downgrade(&lock));
        lock
    }

    /// Waits until no other attempt holds the slot, then takes it.
    pub async fn acquire(&self, calendar_id: &str, slot_id: &str) -> SlotGuard {
        let lock = self.lock_for(calendar_id, slot_id);
        SlotGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of slots currently tracked.
    pub fn tracked(&self) -> usize {
        relock(&self.locks)
            .values()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Records that a write to the slot failed without a definite answer.
    pub fn mark_unsettled(&self, calendar_id: &str, slot_id: &str) {
        relock(&self.unsettled).insert(key(calendar_id, slot_id), Instant::now());
    }

    /// Sleeps until a pending unanswered write can be assumed applied or lost.
    /// Returns immediately for a settled slot. Call it while holding the slot's guard.
    pub async fn wait_settled(&self, calendar_id: &str, slot_id: &str) {
        let failed_at = relock(&self.unsettled).get(&key(calendar_id, slot_id)).copied();
        if let Some(failed_at) = failed_at {
            tokio::time::sleep_until(failed_at + self.settle_window).await;
        }
    }

    /// Forgets the unsettled mark once the store state has been read again.
    pub fn clear_unsettled(&self, calendar_id: &str, slot_id: &str) {
        relock(&self.unsettled).remove(&key(calendar_id, slot_id));
    }

    /// Number of slots with an unanswered write.
    pub fn unsettled(&self) -> usize {
        relock(&self.unsettled).len()
    }
}
