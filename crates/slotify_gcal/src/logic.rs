// --- File: crates/slotify_gcal/src/logic.rs ---
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotify_common::{CalendarStore, HttpStatusCode, NewItem, SlotifyError, StoreItem};
use slotify_config::CalendarConfig;
use tracing::{error, info, warn};

use crate::agenda::{AgendaResolver, ResolvedAgenda};
use crate::arbiter::ReservationArbiter;
use crate::codec::{self, Reservation, SlotMetadata, SlotState};
use crate::error::SlotError;
use crate::partition::partition;
use crate::reservation;
use crate::store::AgendaStore;
use crate::time::{parse_client_timestamp, parse_optional, to_display};

/// Default `max_results` when listing slots.
pub const DEFAULT_SLOT_LIMIT: u32 = 250;
/// Default `max_results` when listing raw events.
pub const DEFAULT_EVENT_LIMIT: u32 = 50;
/// Upper bound on the number of slots one batch request may create.
pub const MAX_BATCH_SLOTS: usize = 500;
/// Longest accepted event summary.
pub const MAX_SUMMARY_LEN: usize = 200;

// --- Views ---

/// A managed slot as exposed to clients. Times are rendered in the configured zone.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub agenda: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub label: String,
    pub state: SlotState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

impl Slot {
    fn build(agenda: &str, item: StoreItem, metadata: SlotMetadata, zone: Tz) -> Option<Self> {
        Some(Slot {
            start: to_display(item.start?, zone),
            end: to_display(item.end?, zone),
            id: item.id,
            agenda: agenda.to_string(),
            label: item.summary.unwrap_or_default(),
            state: metadata.state,
            reservation: metadata.reservation,
        })
    }

    /// Interprets a store item as a slot of `agenda`.
    pub fn from_item(agenda: &str, item: StoreItem, zone: Tz) -> Result<Self, SlotError> {
        let metadata = reservation::classify(&item)?;
        let id = item.id.clone();
        Self::build(agenda, item, metadata, zone).ok_or_else(|| {
            SlotError::unavailable(format!("Store returned slot {} without start/end times", id))
        })
    }
}

/// Any calendar item, managed or not.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub id: String,
    pub agenda: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub status: Option<String>,
    pub html_link: Option<String>,
}

impl EventView {
    fn from_item(agenda: &str, item: StoreItem, zone: Tz) -> Self {
        EventView {
            id: item.id,
            agenda: agenda.to_string(),
            summary: item.summary,
            description: item.description,
            location: item.location,
            start: item.start.map(|s| to_display(s, zone)),
            end: item.end.map(|e| to_display(e, zone)),
            status: item.status,
            html_link: item.html_link,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

// --- Requests ---

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlotListQuery {
    /// RFC 3339, or naive local time in the configured zone.
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    /// 1 to 250, default 250.
    pub max_results: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventListQuery {
    pub agenda: Option<String>,
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    /// 1 to 250, default 50.
    pub max_results: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FreeBusyQuery {
    pub agenda: Option<String>,
    pub time_min: Option<String>,
    pub time_max: Option<String>,
}

/// Body of a slot creation request: either `start`/`end` (one slot) or
/// `range_start`/`range_end`/`slot_minutes` with optional `step_minutes` (a batch).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateSlotsRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    pub slot_minutes: Option<i64>,
    pub step_minutes: Option<i64>,
    /// Appended to the label: `"<prefix> - <service>"`.
    pub service: Option<String>,
    /// Defaults to `AVAILABLE`.
    pub summary_prefix: Option<String>,
}

/// What to create, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSpec {
    Single {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Batch {
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        slot_minutes: i64,
        step_minutes: Option<i64>,
    },
}

impl CreateSlotsRequest {
    /// Picks the single or batch form, rejecting mixed or incomplete requests.
    pub fn to_spec(&self, zone: Tz) -> Result<SlotSpec, SlotError> {
        let single = self.start.is_some() || self.end.is_some();
        let batch = self.range_start.is_some()
            || self.range_end.is_some()
            || self.slot_minutes.is_some()
            || self.step_minutes.is_some();

        match (single, batch) {
            (true, true) => Err(SlotError::validation(
                "Provide either start/end or range_start/range_end/slot_minutes, not both",
            )),
            (false, false) => Err(SlotError::validation(
                "Provide start/end or range_start/range_end/slot_minutes",
            )),
            (true, false) => {
                let (Some(start), Some(end)) = (self.start.as_deref(), self.end.as_deref()) else {
                    return Err(SlotError::validation("Both start and end are required"));
                };
                Ok(SlotSpec::Single {
                    start: parse_client_timestamp(start, zone)?,
                    end: parse_client_timestamp(end, zone)?,
                })
            }
            (false, true) => {
                let (Some(range_start), Some(range_end), Some(slot_minutes)) = (
                    self.range_start.as_deref(),
                    self.range_end.as_deref(),
                    self.slot_minutes,
                ) else {
                    return Err(SlotError::validation(
                        "range_start, range_end and slot_minutes are required",
                    ));
                };
                Ok(SlotSpec::Batch {
                    range_start: parse_client_timestamp(range_start, zone)?,
                    range_end: parse_client_timestamp(range_end, zone)?,
                    slot_minutes,
                    step_minutes: self.step_minutes,
                })
            }
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateEventRequest {
    pub agenda: Option<String>,
    pub summary: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

// --- Responses ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendasResponse {
    pub agendas: Vec<String>,
    pub default: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub agenda: String,
    pub count: usize,
    pub slots: Vec<Slot>,
}

/// Why a batch stopped early.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub kind: String,
    pub message: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotBatchResponse {
    pub agenda: String,
    pub created_count: usize,
    pub created: Vec<Slot>,
    /// Set when creation stopped before every slot was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<BatchFailure>,
}

impl SlotBatchResponse {
    pub fn is_partial(&self) -> bool {
        self.failure.is_some()
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListResponse {
    pub agenda: String,
    pub count: usize,
    pub events: Vec<EventView>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeBusyResponse {
    pub agenda: String,
    pub busy: Vec<BusyPeriod>,
}

// --- Engine ---

/// The slot lifecycle operations for every configured agenda.
pub struct SlotEngine {
    store: Arc<dyn CalendarStore>,
    agendas: AgendaResolver,
    arbiter: ReservationArbiter,
    zone: Tz,
    deadline: Duration,
}

impl SlotEngine {
    pub fn new(
        store: Arc<dyn CalendarStore>,
        agendas: AgendaResolver,
        zone: Tz,
        deadline: Duration,
    ) -> Self {
        Self {
            store,
            agendas,
            arbiter: ReservationArbiter::new(),
            zone,
            deadline,
        }
    }

    pub fn from_config(
        store: Arc<dyn CalendarStore>,
        config: &CalendarConfig,
    ) -> Result<Self, SlotifyError> {
        config.validate_agendas()?;
        Ok(Self::new(
            store,
            AgendaResolver::from_config(config),
            config.time_zone()?,
            Duration::from_secs(config.request_timeout_secs),
        )
        .with_settle_window(Duration::from_secs(config.reservation_settle_secs)))
    }

    /// Replaces the wait applied after an unanswered reservation write.
    pub fn with_settle_window(mut self, settle_window: Duration) -> Self {
        self.arbiter = ReservationArbiter::with_settle_window(settle_window);
        self
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    fn open(&self, agenda: Option<&str>) -> Result<(ResolvedAgenda, AgendaStore), SlotError> {
        let resolved = self.agendas.resolve(agenda).map_err(|e| {
            warn!(requested = ?agenda, "{}", e);
            e
        })?;
        let store = AgendaStore::new(self.store.clone(), resolved.calendar_id.clone(), self.deadline);
        Ok((resolved, store))
    }

    pub fn list_agendas(&self) -> AgendasResponse {
        AgendasResponse {
            agendas: self.agendas.names(),
            default: self.agendas.default_name().map(str::to_string),
        }
    }

    /// Available slots in store order, at most `limit` of them.
    pub async fn list_slots(
        &self,
        agenda: Option<&str>,
        time_min: Option<DateTime<Utc>>,
        time_max: Option<DateTime<Utc>>,
        limit: u32,
    ) -> Result<SlotListResponse, SlotError> {
        let (agenda, store) = self.open(agenda)?;
        info!(
            agenda = %agenda.name,
            calendar_id = %agenda.calendar_id,
            ?time_min,
            ?time_max,
            limit,
            "Listing slots"
        );

        let items = store.enumerate(time_min, time_max, limit).await?;
        let slots: Vec<Slot> = items
            .into_iter()
            .filter_map(|item| {
                let metadata = codec::decode(item.description.as_deref().unwrap_or_default())?;
                if !metadata.is_available() {
                    return None;
                }
                Slot::build(&agenda.name, item, metadata, self.zone)
            })
            .take(limit as usize)
            .collect();

        Ok(SlotListResponse {
            agenda: agenda.name,
            count: slots.len(),
            slots,
        })
    }

    /// One slot in whatever state it is in.
    pub async fn get_slot(&self, agenda: Option<&str>, slot_id: &str) -> Result<Slot, SlotError> {
        let (agenda, store) = self.open(agenda)?;
        info!(agenda = %agenda.name, calendar_id = %agenda.calendar_id, slot_id, "Fetching slot");
        let item = store.fetch(slot_id).await?;
        Slot::from_item(&agenda.name, item, self.zone)
    }

    /// Creates one slot or a batch of slots, one store call at a time.
    ///
    /// Batches are not atomic. When a store call fails midway, the slots created so
    /// far are returned along with the failure; if the very first call fails the
    /// error is returned as is.
    pub async fn create_slots(
        &self,
        agenda: Option<&str>,
        spec: SlotSpec,
        service: Option<&str>,
        summary_prefix: Option<&str>,
    ) -> Result<SlotBatchResponse, SlotError> {
        let intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = match spec {
            SlotSpec::Single { start, end } => {
                if end <= start {
                    return Err(SlotError::validation("end must be after start"));
                }
                vec![(start, end)]
            }
            SlotSpec::Batch {
                range_start,
                range_end,
                slot_minutes,
                step_minutes,
            } => {
                let slots = partition(
                    range_start,
                    range_end,
                    slot_minutes,
                    step_minutes.unwrap_or(slot_minutes),
                )?;
                if slots.remaining() > MAX_BATCH_SLOTS {
                    return Err(SlotError::validation(format!(
                        "Batch would create {} slots, at most {} are allowed",
                        slots.remaining(),
                        MAX_BATCH_SLOTS
                    )));
                }
                slots.collect()
            }
        };

        let (agenda, store) = self.open(agenda)?;
        let label = codec::available_label(summary_prefix, service);
        info!(
            agenda = %agenda.name,
            calendar_id = %agenda.calendar_id,
            planned = intervals.len(),
            label = %label,
            "Creating slots"
        );

        let description = codec::encode(&SlotMetadata::available());
        let mut created = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            let item = NewItem {
                summary: label.clone(),
                description: Some(description.clone()),
                start,
                end,
                ..Default::default()
            };
            let outcome = match store.create(item).await {
                Ok(stored) => Slot::from_item(&agenda.name, stored, self.zone),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(slot) => created.push(slot),
                Err(e) if created.is_empty() => return Err(e),
                Err(e) => {
                    error!(
                        agenda = %agenda.name,
                        created = created.len(),
                        "Slot batch stopped early: {}",
                        e
                    );
                    return Ok(SlotBatchResponse {
                        agenda: agenda.name,
                        created_count: created.len(),
                        created,
                        failure: Some(BatchFailure {
                            kind: e.kind().to_string(),
                            message: e.to_string(),
                        }),
                    });
                }
            }
        }

        Ok(SlotBatchResponse {
            agenda: agenda.name,
            created_count: created.len(),
            created,
            failure: None,
        })
    }

    /// Moves a slot from `available` to `reserved`.
    pub async fn reserve_slot(
        &self,
        agenda: Option<&str>,
        slot_id: &str,
        details: Reservation,
    ) -> Result<Slot, SlotError> {
        let (agenda, store) = self.open(agenda)?;
        info!(agenda = %agenda.name, calendar_id = %agenda.calendar_id, slot_id, "Reserving slot");
        let updated = reservation::reserve(&store, &self.arbiter, slot_id, details).await?;
        Slot::from_item(&agenda.name, updated, self.zone)
    }

    /// Every item in the window, managed or not.
    pub async fn list_events(
        &self,
        agenda: Option<&str>,
        time_min: Option<DateTime<Utc>>,
        time_max: Option<DateTime<Utc>>,
        limit: u32,
    ) -> Result<EventListResponse, SlotError> {
        let (agenda, store) = self.open(agenda)?;
        info!(
            agenda = %agenda.name,
            calendar_id = %agenda.calendar_id,
            ?time_min,
            ?time_max,
            limit,
            "Listing events"
        );
        let events: Vec<EventView> = store
            .enumerate(time_min, time_max, limit)
            .await?
            .into_iter()
            .map(|item| EventView::from_item(&agenda.name, item, self.zone))
            .collect();
        Ok(EventListResponse {
            agenda: agenda.name,
            count: events.len(),
            events,
        })
    }

    /// Creates a plain calendar event.
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<EventView, SlotError> {
        let summary = request.summary.trim().to_string();
        if summary.is_empty() {
            return Err(SlotError::validation("summary must not be empty"));
        }
        if summary.chars().count() > MAX_SUMMARY_LEN {
            return Err(SlotError::validation(format!(
                "summary must be at most {} characters",
                MAX_SUMMARY_LEN
            )));
        }
        let start = parse_client_timestamp(&request.start, self.zone)?;
        let end = parse_client_timestamp(&request.end, self.zone)?;
        if end <= start {
            return Err(SlotError::validation("end must be after start"));
        }
        let mut attendees = Vec::with_capacity(request.attendees.len());
        for attendee in &request.attendees {
            let email = attendee.trim();
            if !looks_like_email(email) {
                return Err(SlotError::validation(format!("Invalid attendee email: '{}'", email)));
            }
            attendees.push(email.to_string());
        }

        let (agenda, store) = self.open(request.agenda.as_deref())?;
        info!(
            agenda = %agenda.name,
            calendar_id = %agenda.calendar_id,
            %start,
            %end,
            attendees = attendees.len(),
            "Creating event"
        );
        let item = NewItem {
            summary,
            description: request.description.filter(|d| !d.is_empty()),
            location: request.location.filter(|l| !l.is_empty()),
            start,
            end,
            attendees,
        };
        let created = store.create(item).await?;
        Ok(EventView::from_item(&agenda.name, created, self.zone))
    }

    /// Busy intervals of the agenda's calendar.
    pub async fn free_busy(
        &self,
        agenda: Option<&str>,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<FreeBusyResponse, SlotError> {
        let (agenda, store) = self.open(agenda)?;
        info!(agenda = %agenda.name, calendar_id = %agenda.calendar_id, %time_min, %time_max, "Querying free/busy");
        let busy = store
            .busy_periods(time_min, time_max)
            .await?
            .into_iter()
            .map(|(start, end)| BusyPeriod {
                start: to_display(start, self.zone),
                end: to_display(end, self.zone),
            })
            .collect();
        Ok(FreeBusyResponse {
            agenda: agenda.name,
            busy,
        })
    }

    // --- Request parsing helpers shared by the HTTP layer ---

    pub fn parse_window(
        &self,
        time_min: Option<&str>,
        time_max: Option<&str>,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), SlotError> {
        Ok((
            parse_optional(time_min, self.zone)?,
            parse_optional(time_max, self.zone)?,
        ))
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
