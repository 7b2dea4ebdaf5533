// File: crates/slotify_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::codec::{Reservation, SlotState};
use crate::handlers;
use crate::logic::{
    AgendasResponse, BatchFailure, BusyPeriod, CreateEventRequest, CreateSlotsRequest,
    EventListResponse, EventView, FreeBusyResponse, Slot, SlotBatchResponse, SlotListResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_agendas_handler,
        handlers::list_events_handler,
        handlers::create_event_handler,
        handlers::free_busy_handler,
        handlers::list_slots_handler,
        handlers::create_slots_handler,
        handlers::get_slot_handler,
        handlers::reserve_slot_handler
    ),
    components(
        schemas(
            AgendasResponse,
            BatchFailure,
            BusyPeriod,
            CreateEventRequest,
            CreateSlotsRequest,
            EventListResponse,
            EventView,
            FreeBusyResponse,
            Reservation,
            Slot,
            SlotBatchResponse,
            SlotListResponse,
            SlotState
        )
    ),
    tags(
        (name = "Calendar", description = "Agendas, raw events and free/busy"),
        (name = "Slots", description = "Slot creation, listing and reservation")
    ),
    servers(
        (url = "/api", description = "Slotify API server")
    )
)]
pub struct GcalApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = GcalApiDoc::openapi();
        for path in [
            "/calendar/agendas",
            "/calendar/events",
            "/calendar/freebusy",
            "/calendar/agendas/{agenda}/slots",
            "/calendar/agendas/{agenda}/slots/{slot_id}",
            "/calendar/agendas/{agenda}/slots/{slot_id}/reserve",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
