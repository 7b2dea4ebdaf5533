// --- File: crates/slotify_config/src/models.rs ---

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while interpreting an already deserialized configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueError {
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Duplicate agenda name: {0}")]
    DuplicateAgenda(String),
    #[error("Agenda '{0}' has an empty calendar_id")]
    EmptyCalendarId(String),
}

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is not set (e.g. "info", "slotify=debug").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<String>,
    /// Forward logs to journald (Linux only, ignored elsewhere).
    #[serde(default)]
    pub journald: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            journald: false,
        }
    }
}

// --- Calendar Store Config ---
/// Which backing store the service talks to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Google,
    /// Process-local store, lost on restart. Useful for local runs and demos.
    Memory,
}

/// One row of the agenda table: a logical agenda name and the calendar backing it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AgendaConfig {
    pub name: String,
    pub calendar_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendarConfig {
    #[serde(default)]
    pub store: StoreKind,
    /// Path to the Google service account key (required for the google store).
    #[serde(default)]
    pub key_path: Option<String>,
    /// IANA zone used to render slot times and to interpret naive timestamps.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub default_agenda: Option<String>,
    /// Kept as a list so the definition order survives deserialization.
    #[serde(default)]
    pub agendas: Vec<AgendaConfig>,
    /// Deadline applied to every call against the backing store.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long a reservation write that got no answer may still land in the store.
    /// The slot is not offered to another customer before this has passed.
    #[serde(default = "default_reservation_settle_secs")]
    pub reservation_settle_secs: u64,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_reservation_settle_secs() -> u64 {
    30
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            key_path: None,
            time_zone: default_time_zone(),
            default_agenda: None,
            agendas: Vec::new(),
            request_timeout_secs: default_request_timeout_secs(),
            reservation_settle_secs: default_reservation_settle_secs(),
        }
    }
}

impl CalendarConfig {
    /// Parses the configured IANA zone name.
    pub fn time_zone(&self) -> Result<Tz, ConfigValueError> {
        Tz::from_str(self.time_zone.trim())
            .map_err(|_| ConfigValueError::UnknownTimeZone(self.time_zone.clone()))
    }

    /// Checks the agenda table for duplicate names and empty calendar ids.
    pub fn validate_agendas(&self) -> Result<(), ConfigValueError> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.agendas.len());
        for agenda in &self.agendas {
            if seen.contains(&agenda.name.as_str()) {
                return Err(ConfigValueError::DuplicateAgenda(agenda.name.clone()));
            }
            if agenda.calendar_id.trim().is_empty() {
                return Err(ConfigValueError::EmptyCalendarId(agenda.name.clone()));
            }
            seen.push(agenda.name.as_str());
        }
        Ok(())
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}
