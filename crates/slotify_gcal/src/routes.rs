// --- File: crates/slotify_gcal/src/routes.rs ---

use crate::handlers::{
    create_event_handler, create_slots_handler, free_busy_handler, get_slot_handler,
    list_agendas_handler, list_events_handler, list_slots_handler, reserve_slot_handler, GcalState,
};
use crate::logic::SlotEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing every calendar and slot route, relative to `/api`.
pub fn routes(engine: Arc<SlotEngine>) -> Router {
    let gcal_state = Arc::new(GcalState { engine });

    Router::new()
        .route("/calendar/agendas", get(list_agendas_handler))
        .route(
            "/calendar/events",
            get(list_events_handler).post(create_event_handler),
        )
        .route("/calendar/freebusy", get(free_busy_handler))
        .route(
            "/calendar/agendas/{agenda}/slots",
            get(list_slots_handler).post(create_slots_handler),
        )
        .route(
            "/calendar/agendas/{agenda}/slots/{slot_id}",
            get(get_slot_handler),
        )
        .route(
            "/calendar/agendas/{agenda}/slots/{slot_id}/reserve",
            post(reserve_slot_handler),
        )
        .with_state(gcal_state)
}
