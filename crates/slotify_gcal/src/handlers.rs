// File: crates/slotify_gcal/src/handlers.rs
use crate::codec::Reservation;
use crate::error::SlotError;
use crate::extract::{ApiJson, ApiQuery};
use crate::logic::{
    AgendasResponse, CreateEventRequest, CreateSlotsRequest, EventListQuery, EventListResponse,
    EventView, FreeBusyQuery, FreeBusyResponse, Slot, SlotBatchResponse, SlotEngine,
    SlotListQuery, SlotListResponse, DEFAULT_EVENT_LIMIT, DEFAULT_SLOT_LIMIT,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

// Shared state needed by the calendar handlers
#[derive(Clone)]
pub struct GcalState {
    pub engine: Arc<SlotEngine>,
}

/// Lists the configured agendas.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/agendas",
    responses(
        (status = 200, description = "Configured agendas in definition order", body = AgendasResponse)
    ),
    tag = "Calendar"
))]
pub async fn list_agendas_handler(State(state): State<Arc<GcalState>>) -> Json<AgendasResponse> {
    Json(state.engine.list_agendas())
}

/// Lists raw calendar events, managed slots included.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "Events in the window", body = EventListResponse),
        (status = 400, description = "Invalid query or unknown agenda"),
        (status = 502, description = "Calendar store unavailable")
    ),
    tag = "Calendar"
))]
pub async fn list_events_handler(
    State(state): State<Arc<GcalState>>,
    ApiQuery(query): ApiQuery<EventListQuery>,
) -> Result<Json<EventListResponse>, SlotError> {
    let (time_min, time_max) = state
        .engine
        .parse_window(query.time_min.as_deref(), query.time_max.as_deref())?;
    let response = state
        .engine
        .list_events(
            query.agenda.as_deref(),
            time_min,
            time_max,
            query.max_results.unwrap_or(DEFAULT_EVENT_LIMIT),
        )
        .await?;
    Ok(Json(response))
}

/// Creates a plain calendar event.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/calendar/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventView),
        (status = 400, description = "Invalid event or unknown agenda"),
        (status = 502, description = "Calendar store unavailable")
    ),
    tag = "Calendar"
))]
pub async fn create_event_handler(
    State(state): State<Arc<GcalState>>,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventView>), SlotError> {
    let event = state.engine.create_event(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Busy intervals of an agenda's calendar.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/freebusy",
    params(FreeBusyQuery),
    responses(
        (status = 200, description = "Busy intervals", body = FreeBusyResponse),
        (status = 400, description = "Missing bounds or unknown agenda"),
        (status = 502, description = "Calendar store unavailable")
    ),
    tag = "Calendar"
))]
pub async fn free_busy_handler(
    State(state): State<Arc<GcalState>>,
    ApiQuery(query): ApiQuery<FreeBusyQuery>,
) -> Result<Json<FreeBusyResponse>, SlotError> {
    let (time_min, time_max) = state
        .engine
        .parse_window(query.time_min.as_deref(), query.time_max.as_deref())?;
    let (Some(time_min), Some(time_max)) = (time_min, time_max) else {
        return Err(SlotError::validation("time_min and time_max are required"));
    };
    let response = state
        .engine
        .free_busy(query.agenda.as_deref(), time_min, time_max)
        .await?;
    Ok(Json(response))
}

/// Lists available slots of an agenda.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/agendas/{agenda}/slots",
    params(
        ("agenda" = String, Path, description = "Agenda name"),
        SlotListQuery
    ),
    responses(
        (status = 200, description = "Available slots", body = SlotListResponse),
        (status = 400, description = "Invalid query or unknown agenda"),
        (status = 502, description = "Calendar store unavailable")
    ),
    tag = "Slots"
))]
pub async fn list_slots_handler(
    State(state): State<Arc<GcalState>>,
    Path(agenda): Path<String>,
    ApiQuery(query): ApiQuery<SlotListQuery>,
) -> Result<Json<SlotListResponse>, SlotError> {
    let (time_min, time_max) = state
        .engine
        .parse_window(query.time_min.as_deref(), query.time_max.as_deref())?;
    let response = state
        .engine
        .list_slots(
            Some(agenda.as_str()),
            time_min,
            time_max,
            query.max_results.unwrap_or(DEFAULT_SLOT_LIMIT),
        )
        .await?;
    Ok(Json(response))
}

/// Creates one slot or a batch of slots.
///
/// Answers 201 when everything was created and 207 when a batch stopped early.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/calendar/agendas/{agenda}/slots",
    params(("agenda" = String, Path, description = "Agenda name")),
    request_body = CreateSlotsRequest,
    responses(
        (status = 201, description = "All slots created", body = SlotBatchResponse),
        (status = 207, description = "Batch stopped early; lists what was created", body = SlotBatchResponse),
        (status = 400, description = "Invalid request or unknown agenda"),
        (status = 502, description = "Calendar store unavailable")
    ),
    tag = "Slots"
))]
pub async fn create_slots_handler(
    State(state): State<Arc<GcalState>>,
    Path(agenda): Path<String>,
    ApiJson(request): ApiJson<CreateSlotsRequest>,
) -> Result<(StatusCode, Json<SlotBatchResponse>), SlotError> {
    let spec = request.to_spec(state.engine.zone())?;
    let batch = state
        .engine
        .create_slots(
            Some(agenda.as_str()),
            spec,
            request.service.as_deref(),
            request.summary_prefix.as_deref(),
        )
        .await?;
    let status = if batch.is_partial() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(batch)))
}

/// Fetches one slot in any state.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/calendar/agendas/{agenda}/slots/{slot_id}",
    params(
        ("agenda" = String, Path, description = "Agenda name"),
        ("slot_id" = String, Path, description = "Slot identifier")
    ),
    responses(
        (status = 200, description = "The slot", body = Slot),
        (status = 400, description = "Item is not a managed slot, or unknown agenda"),
        (status = 404, description = "Slot not found"),
        (status = 502, description = "Calendar store unavailable")
    ),
    tag = "Slots"
))]
pub async fn get_slot_handler(
    State(state): State<Arc<GcalState>>,
    Path((agenda, slot_id)): Path<(String, String)>,
) -> Result<Json<Slot>, SlotError> {
    let slot = state.engine.get_slot(Some(agenda.as_str()), &slot_id).await?;
    Ok(Json(slot))
}

/// Reserves an available slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/calendar/agendas/{agenda}/slots/{slot_id}/reserve",
    params(
        ("agenda" = String, Path, description = "Agenda name"),
        ("slot_id" = String, Path, description = "Slot identifier")
    ),
    request_body(content = Reservation, example = json!({
        "customer_name": "Ana",
        "customer_phone": "+34 600 000 000",
        "notes": "First visit"
    })),
    responses(
        (status = 200, description = "Slot reserved", body = Slot),
        (status = 400, description = "Invalid details, not a managed slot, or unknown agenda"),
        (status = 404, description = "Slot not found"),
        (status = 409, description = "Slot already reserved"),
        (status = 502, description = "Calendar store unavailable"),
        (status = 504, description = "Calendar store timed out")
    ),
    tag = "Slots"
))]
pub async fn reserve_slot_handler(
    State(state): State<Arc<GcalState>>,
    Path((agenda, slot_id)): Path<(String, String)>,
    ApiJson(details): ApiJson<Reservation>,
) -> Result<Json<Slot>, SlotError> {
    let slot = state
        .engine
        .reserve_slot(Some(agenda.as_str()), &slot_id, details)
        .await?;
    Ok(Json(slot))
}
