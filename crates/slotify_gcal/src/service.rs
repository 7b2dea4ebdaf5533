// --- File: crates/slotify_gcal/src/service.rs ---
//! Google Calendar implementation of the [`CalendarStore`] contract.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use google_calendar3::api::{
    Event, EventAttendee, EventDateTime, FreeBusyRequest, FreeBusyRequestItem,
};
use slotify_common::{BoxFuture, CalendarStore, ItemPatch, ItemQuery, NewItem, StoreError, StoreItem};
use tracing::{debug, warn};

use crate::auth::HubType;

/// Maps a Google API failure onto the store taxonomy.
///
/// 404 and 410 (deleted) become `NotFound`, other client errors `Rejected`, anything
/// else (transport, 5xx, decoding) `Unavailable`.
pub fn classify_api_error(err: google_calendar3::Error) -> StoreError {
    let status = match &err {
        google_calendar3::Error::BadRequest(body) => body["error"]["code"]
            .as_u64()
            .and_then(|c| u16::try_from(c).ok()),
        google_calendar3::Error::Failure(response) => Some(response.status().as_u16()),
        _ => None,
    };
    classify_status(status, err.to_string())
}

fn classify_status(status: Option<u16>, message: String) -> StoreError {
    match status {
        Some(404) | Some(410) => StoreError::NotFound(message),
        Some(code) if (400..500).contains(&code) => StoreError::Rejected(message),
        _ => StoreError::Unavailable(message),
    }
}

fn to_store_item(event: Event) -> StoreItem {
    StoreItem {
        id: event.id.unwrap_or_default(),
        summary: event.summary,
        description: event.description,
        location: event.location,
        start: event.start.and_then(|s| s.date_time),
        end: event.end.and_then(|e| e.date_time),
        status: event.status,
        etag: event.etag,
        html_link: event.html_link,
    }
}

fn event_time(instant: DateTime<Utc>) -> EventDateTime {
    EventDateTime {
        date_time: Some(instant),
        time_zone: Some("UTC".to_string()),
        ..Default::default()
    }
}

/// Google Calendar store.
pub struct GoogleCalendarStore {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarStore {
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarStore for GoogleCalendarStore {
    fn enumerate(&self, calendar_id: &str, query: ItemQuery) -> BoxFuture<'_, Vec<StoreItem>, StoreError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let mut request = calendar_hub
                .events()
                .list(&calendar_id)
                .single_events(true) // Expand recurring events
                .order_by("startTime")
                .max_results(query.max_results as i32);
            if let Some(time_min) = query.time_min {
                request = request.time_min(time_min);
            }
            if let Some(time_max) = query.time_max {
                request = request.time_max(time_max);
            }

            let (_, events) = request.doit().await.map_err(classify_api_error)?;
            let items: Vec<StoreItem> = events
                .items
                .unwrap_or_default()
                .into_iter()
                .map(to_store_item)
                .collect();
            debug!(calendar_id = %calendar_id, count = items.len(), "Listed events");
            Ok(items)
        })
    }

    fn fetch(&self, calendar_id: &str, item_id: &str) -> BoxFuture<'_, StoreItem, StoreError> {
        let calendar_id = calendar_id.to_string();
        let item_id = item_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_, event) = calendar_hub
                .events()
                .get(&calendar_id, &item_id)
                .doit()
                .await
                .map_err(classify_api_error)?;
            Ok(to_store_item(event))
        })
    }

    fn create(&self, calendar_id: &str, item: NewItem) -> BoxFuture<'_, StoreItem, StoreError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let attendees: Vec<EventAttendee> = item
                .attendees
                .into_iter()
                .map(|email| EventAttendee {
                    email: Some(email),
                    ..Default::default()
                })
                .collect();
            let new_event = Event {
                summary: Some(item.summary),
                description: item.description,
                location: item.location,
                start: Some(event_time(item.start)),
                end: Some(event_time(item.end)),
                attendees: if attendees.is_empty() { None } else { Some(attendees) },
                ..Default::default()
            };

            let (_, created) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await
                .map_err(classify_api_error)?;
            Ok(to_store_item(created))
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
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            // Fields left as None are omitted from the PATCH body and stay untouched.
            let changes = Event {
                summary: patch.summary,
                description: patch.description,
                ..Default::default()
            };
            let (_, updated) = calendar_hub
                .events()
                .patch(changes, &calendar_id, &item_id)
                .send_updates("none")
                .doit()
                .await
                .map_err(classify_api_error)?;
            Ok(to_store_item(updated))
        })
    }

    fn busy_periods(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<(DateTime<Utc>, DateTime<Utc>)>, StoreError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(start),
                time_max: Some(end),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_, response) = calendar_hub
                .freebusy()
                .query(req)
                .doit()
                .await
                .map_err(classify_api_error)?;

            let calendar = response
                .calendars
                .and_then(|mut calendars| calendars.remove(&calendar_id));
            if let Some(errors) = calendar.as_ref().and_then(|c| c.errors.as_ref()) {
                if !errors.is_empty() {
                    return Err(StoreError::Rejected(format!(
                        "free/busy lookup failed for {}: {:?}",
                        calendar_id, errors
                    )));
                }
            }

            let mut busy_periods = Vec::new();
            for period in calendar.and_then(|c| c.busy).unwrap_or_default() {
                match (period.start, period.end) {
                    (Some(s), Some(e)) => busy_periods.push((s, e)),
                    _ => warn!("Skipping busy period with missing start/end: {:?}", period),
                }
            }
            busy_periods.sort_by_key(|k| k.0);
            Ok(busy_periods)
        })
    }
}
