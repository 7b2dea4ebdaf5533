// --- File: crates/slotify_gcal/src/time.rs ---
//! Timestamp handling at the client boundary.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::SlotError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a client supplied timestamp.
///
/// Offset-qualified RFC 3339 values are taken as is. Naive values are read as wall
/// clock time in `zone`: a time skipped by a DST jump is rejected, a repeated one
/// resolves to its earlier instant.
pub fn parse_client_timestamp(raw: &str, zone: Tz) -> Result<DateTime<Utc>, SlotError> {
    let raw = raw.trim();
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Ok(aware.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| SlotError::validation(format!("Invalid timestamp: '{}'", raw)))?;

    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(SlotError::validation(format!(
            "Timestamp '{}' does not exist in time zone {}",
            raw,
            zone.name()
        ))),
    }
}

/// Parses an optional timestamp, treating blank input as absent.
pub fn parse_optional(raw: Option<&str>, zone: Tz) -> Result<Option<DateTime<Utc>>, SlotError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => parse_client_timestamp(raw, zone).map(Some),
        None => Ok(None),
    }
}

/// Renders an instant in the display zone with its fixed offset.
pub fn to_display(instant: DateTime<Utc>, zone: Tz) -> DateTime<FixedOffset> {
    instant.with_timezone(&zone).fixed_offset()
}
