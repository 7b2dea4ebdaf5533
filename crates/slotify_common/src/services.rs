//! Store abstractions for calendar providers.
//!
//! The slot core never talks to a provider SDK directly. It consumes the
//! [`CalendarStore`] trait, which models a remote calendar as a collection of
//! loosely typed items that can be listed, fetched, created and patched.
//! Implementations live next to the provider they wrap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Failures reported by a calendar store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The collection or the item does not exist.
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The provider refused the request (validation, permissions, quota).
    #[error("Request rejected by calendar provider: {0}")]
    Rejected(String),
    /// Transport failure or provider-side error.
    #[error("Calendar provider unavailable: {0}")]
    Unavailable(String),
}

/// A raw calendar item as persisted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreItem {
    /// Identifier assigned by the provider.
    pub id: String,
    /// Title shown in calendar UIs.
    pub summary: Option<String>,
    /// Free-text field; the slot core keeps its metadata here.
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Provider status, e.g. "confirmed" or "cancelled".
    pub status: Option<String>,
    /// Provider revision tag, changes on every write.
    pub etag: Option<String>,
    pub html_link: Option<String>,
}

/// Parameters for listing items of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemQuery {
    /// Lower bound (exclusive) on an item's end time.
    pub time_min: Option<DateTime<Utc>>,
    /// Upper bound (exclusive) on an item's start time.
    pub time_max: Option<DateTime<Utc>>,
    pub max_results: u32,
}

/// Payload for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewItem {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub attendees: Vec<String>,
}

/// Merge-patch for an existing item: `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPatch {
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl ItemPatch {
    /// Returns true when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.description.is_none()
    }
}

/// A trait for calendar store operations.
///
/// Every method addresses one collection by `calendar_id`. Implementations must not retry;
/// retry policy belongs to the caller.
pub trait CalendarStore: Send + Sync {
    /// List items overlapping the query window, ordered by start time ascending and
    /// truncated at `query.max_results`.
    fn enumerate(&self, calendar_id: &str, query: ItemQuery)
        -> BoxFuture<'_, Vec<StoreItem>, StoreError>;

    /// Fetch one item by id.
    fn fetch(&self, calendar_id: &str, item_id: &str) -> BoxFuture<'_, StoreItem, StoreError>;

    /// Create an item. The provider assigns the id and echoes back what it persisted.
    fn create(&self, calendar_id: &str, item: NewItem) -> BoxFuture<'_, StoreItem, StoreError>;

    /// Apply a merge-patch to an item.
    fn update(
        &self,
        calendar_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> BoxFuture<'_, StoreItem, StoreError>;

    /// Busy intervals of the collection within `[start, end)`, sorted by start.
    #[allow(clippy::type_complexity)]
    fn busy_periods(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, StoreError>;
}
