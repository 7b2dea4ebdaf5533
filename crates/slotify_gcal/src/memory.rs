// --- File: crates/slotify_gcal/src/memory.rs ---
//! Process-local calendar store.
//!
//! Mirrors the provider's listing semantics (an item is in the window when it ends
//! after `time_min` and starts before `time_max`, ordered by start) so it can stand in
//! for Google Calendar in tests and local runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use slotify_common::{BoxFuture, CalendarStore, ItemPatch, ItemQuery, NewItem, StoreError, StoreItem};
use uuid::Uuid;

#[derive(Default)]
struct Calendar {
    items: Vec<StoreItem>,
    revision: u64,
}

#[derive(Default)]
pub struct InMemoryCalendarStore {
    calendars: Mutex<HashMap<String, Calendar>>,
    latency: Mutex<Option<Duration>>,
    unavailable: AtomicBool,
}

impl InMemoryCalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before touching the data.
    pub fn with_latency(self, latency: Duration) -> Self {
        if let Ok(mut slot) = self.latency.lock() {
            *slot = Some(latency);
        }
        self
    }

    /// While set, every call fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inserts an item as is, e.g. an event written by another tool.
    pub fn insert_raw(&self, calendar_id: &str, item: StoreItem) {
        if let Ok(mut calendars) = self.calendars.lock() {
            calendars
                .entry(calendar_id.to_string())
                .or_default()
                .items
                .push(item);
        }
    }

    /// Number of items stored for the calendar.
    pub fn len(&self, calendar_id: &str) -> usize {
        self.calendars
            .lock()
            .map(|c| c.get(calendar_id).map_or(0, |cal| cal.items.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, calendar_id: &str) -> bool {
        self.len(calendar_id) == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Calendar>>, StoreError> {
        self.calendars
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store poisoned".to_string()))
    }

    async fn enter(&self) -> Result<(), StoreError> {
        let latency = self.latency.lock().map(|l| *l).unwrap_or(None);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".to_string()));
        }
        Ok(())
    }
}

fn in_window(item: &StoreItem, query: &ItemQuery) -> bool {
    let after_min = match (query.time_min, item.end) {
        (Some(min), Some(end)) => end > min,
        _ => true,
    };
    let before_max = match (query.time_max, item.start) {
        (Some(max), Some(start)) => start < max,
        _ => true,
    };
    after_min && before_max
}

fn overlaps(item: &StoreItem, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    match (item.start, item.end) {
        (Some(s), Some(e)) => s < end && e > start,
        _ => false,
    }
}

impl CalendarStore for InMemoryCalendarStore {
    fn enumerate(&self, calendar_id: &str, query: ItemQuery) -> BoxFuture<'_, Vec<StoreItem>, StoreError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.enter().await?;
            let calendars = self.lock()?;
            let mut items: Vec<StoreItem> = calendars
                .get(&calendar_id)
                .map(|cal| {
                    cal.items
                        .iter()
                        .filter(|item| item.status.as_deref() != Some("cancelled"))
                        .filter(|item| in_window(item, &query))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            // Stable sort keeps insertion order for equal starts.
            items.sort_by_key(|item| item.start);
            items.truncate(query.max_results as usize);
            Ok(items)
        })
    }

    fn fetch(&self, calendar_id: &str, item_id: &str) -> BoxFuture<'_, StoreItem, StoreError> {
        let calendar_id = calendar_id.to_string();
        let item_id = item_id.to_string();
        Box::pin(async move {
            self.enter().await?;
            let calendars = self.lock()?;
            calendars
                .get(&calendar_id)
                .and_then(|cal| cal.items.iter().find(|item| item.id == item_id))
                .cloned()
                .ok_or(StoreError::NotFound(item_id))
        })
    }

    fn create(&self, calendar_id: &str, item: NewItem) -> BoxFuture<'_, StoreItem, StoreError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.enter().await?;
            if item.end <= item.start {
                return Err(StoreError::Rejected("The specified time range is empty.".to_string()));
            }
            let mut calendars = self.lock()?;
            let calendar = calendars.entry(calendar_id).or_default();
            calendar.revision += 1;
            let stored = StoreItem {
                id: Uuid::new_v4().simple().to_string(),
                summary: Some(item.summary),
                description: item.description,
                location: item.location,
                start: Some(item.start),
                end: Some(item.end),
                status: Some("confirmed".to_string()),
                etag: Some(format!("\"{}\"", calendar.revision)),
                html_link: None,
            };
            calendar.items.push(stored.clone());
            Ok(stored)
        })
    }

    fn update(
        &self,
        calendar_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> BoxFuture<'_, StoreItem, StoreError> {
        let calendar_id = calendar_id.to_string();
        let item_id = item_id.to_string();
        Box::pin(async move {
            self.enter().await?;
            let mut calendars = self.lock()?;
            let calendar = calendars
                .get_mut(&calendar_id)
                .ok_or_else(|| StoreError::NotFound(item_id.clone()))?;
            calendar.revision += 1;
            let revision = calendar.revision;
            let item = calendar
                .items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or(StoreError::NotFound(item_id))?;
            if let Some(summary) = patch.summary {
                item.summary = Some(summary);
            }
            if let Some(description) = patch.description {
                item.description = Some(description);
            }
            item.etag = Some(format!("\"{}\"", revision));
            Ok(item.clone())
        })
    }

    fn busy_periods(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, StoreError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.enter().await?;
            let calendars = self.lock()?;
            let mut busy: Vec<_> = calendars
                .get(&calendar_id)
                .map(|cal| {
                    cal.items
                        .iter()
                        .filter(|item| item.status.as_deref() != Some("cancelled"))
                        .filter(|item| overlaps(item, start, end))
                        .filter_map(|item| Some((item.start?.max(start), item.end?.min(end))))
                        .collect()
                })
                .unwrap_or_default();
            busy.sort_by_key(|period| period.0);
            Ok(busy)
        })
    }
}
