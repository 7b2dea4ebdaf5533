// --- File: crates/slotify_gcal/src/store.rs ---
//! One agenda's view of the backing calendar store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use slotify_common::{BoxFuture, CalendarStore, ItemPatch, ItemQuery, NewItem, StoreError, StoreItem};
use tracing::error;

use crate::error::SlotError;

/// Bounds accepted for `max_results` on any listing.
pub const MAX_RESULTS_RANGE: std::ops::RangeInclusive<u32> = 1..=250;

/// Store adapter bound to a single calendar.
///
/// Each call is limited by the configured deadline. Nothing is retried: a failed or
/// expired call surfaces as `SlotError::StoreUnavailable`, except a missing item on
/// `fetch`/`update`, which surfaces as `SlotError::SlotNotFound`.
#[derive(Clone)]
pub struct AgendaStore {
    store: Arc<dyn CalendarStore>,
    calendar_id: String,
    deadline: Duration,
}

impl AgendaStore {
    pub fn new(store: Arc<dyn CalendarStore>, calendar_id: impl Into<String>, deadline: Duration) -> Self {
        Self {
            store,
            calendar_id: calendar_id.into(),
            deadline,
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        item_id: Option<&str>,
        call: BoxFuture<'_, T, StoreError>,
    ) -> Result<T, SlotError> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let err = SlotError::from_store(e, item_id);
                if matches!(err, SlotError::StoreUnavailable { .. }) {
                    error!(calendar_id = %self.calendar_id, operation, "Store call failed: {}", err);
                }
                Err(err)
            }
            Err(_) => {
                error!(
                    calendar_id = %self.calendar_id,
                    operation,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Store call timed out"
                );
                Err(SlotError::timed_out(format!(
                    "{} did not complete within {:?}",
                    operation, self.deadline
                )))
            }
        }
    }

    /// Items overlapping the window, by start time, at most `max_results` of them.
    pub async fn enumerate(
        &self,
        time_min: Option<DateTime<Utc>>,
        time_max: Option<DateTime<Utc>>,
        max_results: u32,
    ) -> Result<Vec<StoreItem>, SlotError> {
        if !MAX_RESULTS_RANGE.contains(&max_results) {
            return Err(SlotError::validation(format!(
                "max_results must be between {} and {}",
                MAX_RESULTS_RANGE.start(),
                MAX_RESULTS_RANGE.end()
            )));
        }
        if let (Some(min), Some(max)) = (time_min, time_max) {
            if max <= min {
                return Err(SlotError::validation("time_max must be after time_min"));
            }
        }
        let query = ItemQuery {
            time_min,
            time_max,
            max_results,
        };
        let mut items = self
            .bounded("enumerate", None, self.store.enumerate(&self.calendar_id, query))
            .await?;
        items.truncate(max_results as usize);
        Ok(items)
    }

    pub async fn fetch(&self, item_id: &str) -> Result<StoreItem, SlotError> {
        self.bounded("fetch", Some(item_id), self.store.fetch(&self.calendar_id, item_id))
            .await
    }

    pub async fn create(&self, item: NewItem) -> Result<StoreItem, SlotError> {
        self.bounded("create", None, self.store.create(&self.calendar_id, item))
            .await
    }

    pub async fn update(&self, item_id: &str, patch: ItemPatch) -> Result<StoreItem, SlotError> {
        self.bounded(
            "update",
            Some(item_id),
            self.store.update(&self.calendar_id, item_id, patch),
        )
        .await
    }

    pub async fn busy_periods(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, SlotError> {
        if end <= start {
            return Err(SlotError::validation("time_max must be after time_min"));
        }
        self.bounded(
            "busy_periods",
            None,
            self.store.busy_periods(&self.calendar_id, start, end),
        )
        .await
    }
}
