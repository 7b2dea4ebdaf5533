//! Test fixtures for the slot engine
//!
//! Shared builders for the integration tests: an engine over the in-memory
//! store with a small agenda table, and fixed instants.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotify_config::{AgendaConfig, CalendarConfig, StoreKind};
use slotify_gcal::codec::Reservation;
use slotify_gcal::memory::InMemoryCalendarStore;
use slotify_gcal::SlotEngine;
use std::sync::Arc;
use std::time::Duration;

pub const CLINIC_CALENDAR: &str = "clinic@group.calendar.google.com";

/// A calendar config with two agendas, `clinic` being the default.
pub fn create_calendar_config() -> CalendarConfig {
    CalendarConfig {
        store: StoreKind::Memory,
        time_zone: "UTC".to_string(),
        default_agenda: Some("clinic".to_string()),
        agendas: vec![
            AgendaConfig {
                name: "clinic".to_string(),
                calendar_id: CLINIC_CALENDAR.to_string(),
            },
            AgendaConfig {
                name: "salon".to_string(),
                calendar_id: "salon@group.calendar.google.com".to_string(),
            },
        ],
        ..Default::default()
    }
}

/// Engine over a fresh in-memory store; the store is returned for inspection.
pub fn create_engine() -> (Arc<InMemoryCalendarStore>, SlotEngine) {
    create_engine_with_store(InMemoryCalendarStore::new())
}

pub fn create_engine_with_store(store: InMemoryCalendarStore) -> (Arc<InMemoryCalendarStore>, SlotEngine) {
    let store = Arc::new(store);
    let engine = SlotEngine::from_config(store.clone(), &create_calendar_config())
        .unwrap_or_else(|e| panic!("fixture config must be valid: {}", e));
    (store, engine)
}

/// Engine whose store answers every call after `latency`.
pub fn create_slow_engine(latency: Duration) -> (Arc<InMemoryCalendarStore>, SlotEngine) {
    create_engine_with_store(InMemoryCalendarStore::new().with_latency(latency))
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, hour, minute, 0).unwrap()
}

pub fn reservation(name: &str) -> Reservation {
    Reservation {
        customer_name: name.to_string(),
        customer_phone: None,
        notes: None,
    }
}

pub fn zone() -> Tz {
    Tz::UTC
}
