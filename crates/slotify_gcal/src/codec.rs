// --- File: crates/slotify_gcal/src/codec.rs ---
//! Slot metadata stored in a calendar item's free-text description.
//!
//! Grammar (version 1), one entry per line:
//!
//! ```text
//! type=slot
//! state=available | state=reserved
//! customer_name=<text>      (reserved only)
//! customer_phone=<text>     (optional)
//! notes=<text>              (optional)
//! ```
//!
//! A line is split on its first `=`; surrounding whitespace is ignored. Lines that do
//! not belong to the grammar are carried along untouched.
//!
//! Classification is looser than encoding because descriptions edited in the calendar
//! web UI come back as HTML (`type=slot<br>state=available`). An item is a managed slot
//! when the literal `type=slot` appears anywhere (or as a whitespace-padded line), and
//! its state is found the same way. If both states appear, `reserved` wins.

use serde::{Deserialize, Serialize};

pub const KIND_KEY: &str = "type";
pub const KIND_SLOT: &str = "slot";
pub const STATE_KEY: &str = "state";
pub const CUSTOMER_NAME_KEY: &str = "customer_name";
pub const CUSTOMER_PHONE_KEY: &str = "customer_phone";
pub const NOTES_KEY: &str = "notes";

/// Label prefix used for newly created slots unless the caller supplies one.
pub const DEFAULT_SUMMARY_PREFIX: &str = "AVAILABLE";
pub const RESERVED_PREFIX: &str = "RESERVED";

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Available,
    Reserved,
}

impl SlotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotState::Available => "available",
            SlotState::Reserved => "reserved",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(SlotState::Available),
            "reserved" => Some(SlotState::Reserved),
            _ => None,
        }
    }
}

/// Customer details attached to a slot when it is reserved.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Decoded slot metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMetadata {
    pub state: SlotState,
    /// Present only when `state` is `Reserved`.
    pub reservation: Option<Reservation>,
}

impl SlotMetadata {
    pub fn available() -> Self {
        Self {
            state: SlotState::Available,
            reservation: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == SlotState::Available
    }
}

const HTML_BREAK: &str = "<br";

/// Lines of the blob, with HTML line breaks treated as newlines.
fn fragments(blob: &str) -> impl Iterator<Item = &str> {
    blob.lines().flat_map(|line| {
        line.split(HTML_BREAK).enumerate().map(|(i, part)| {
            if i == 0 {
                return part;
            }
            // Rest of the tag: `>`, `/>` or ` />`.
            let rest = part.trim_start_matches([' ', '/']);
            rest.strip_prefix('>').unwrap_or(part)
        })
    })
}

fn entries(blob: &str) -> impl Iterator<Item = (&str, &str)> {
    fragments(blob).filter_map(|line| {
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}

fn marker(key: &str, value: &str) -> String {
    format!("{}={}", key, value)
}

/// Single-line form of a free-text value.
fn sanitize(value: &str) -> String {
    value
        .split(|c: char| c == '\r' || c == '\n')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(sanitize).filter(|v| !v.is_empty())
}

fn reservation_lines(reservation: &Reservation) -> Vec<String> {
    let mut lines = vec![format!(
        "{}={}",
        CUSTOMER_NAME_KEY,
        sanitize(&reservation.customer_name)
    )];
    if let Some(phone) = non_empty(reservation.customer_phone.as_deref()) {
        lines.push(format!("{}={}", CUSTOMER_PHONE_KEY, phone));
    }
    if let Some(notes) = non_empty(reservation.notes.as_deref()) {
        lines.push(format!("{}={}", NOTES_KEY, notes));
    }
    lines
}

/// Returns true when the blob carries the `type=slot` marker, whatever its state.
pub fn has_slot_marker(blob: &str) -> bool {
    blob.contains(&marker(KIND_KEY, KIND_SLOT))
        || entries(blob).any(|(k, v)| k == KIND_KEY && v == KIND_SLOT)
}

/// Serializes metadata into a fresh description.
pub fn encode(metadata: &SlotMetadata) -> String {
    let mut lines = vec![
        format!("{}={}", KIND_KEY, KIND_SLOT),
        format!("{}={}", STATE_KEY, metadata.state.as_str()),
    ];
    if metadata.state == SlotState::Reserved {
        if let Some(reservation) = &metadata.reservation {
            lines.extend(reservation_lines(reservation));
        }
    }
    lines.join("\n")
}

/// Classifies a description. `None` means the item is not a managed slot.
pub fn decode(blob: &str) -> Option<SlotMetadata> {
    if !has_slot_marker(blob) {
        return None;
    }
    let mut state = [SlotState::Reserved, SlotState::Available]
        .into_iter()
        .find(|s| blob.contains(&marker(STATE_KEY, s.as_str())));
    let mut name = None;
    let mut phone = None;
    let mut notes = None;

    for (key, value) in entries(blob) {
        match key {
            STATE_KEY => match (state, SlotState::parse(value)) {
                (_, Some(SlotState::Reserved)) => state = Some(SlotState::Reserved),
                (None, parsed) => state = parsed,
                _ => {}
            },
            CUSTOMER_NAME_KEY => name = Some(value.to_string()),
            CUSTOMER_PHONE_KEY => phone = Some(value.to_string()),
            NOTES_KEY => notes = Some(value.to_string()),
            _ => {}
        }
    }

    let state = state?;
    let reservation = match state {
        SlotState::Available => None,
        SlotState::Reserved => Some(Reservation {
            customer_name: name.unwrap_or_default(),
            customer_phone: phone.filter(|p| !p.is_empty()),
            notes: notes.filter(|n| !n.is_empty()),
        }),
    };
    Some(SlotMetadata { state, reservation })
}

/// Rewrites an available slot's description as reserved.
///
/// Every `state=available` line becomes `state=reserved`, and the `state=available`
/// substring is replaced wherever else it occurs (e.g. inside an HTML description).
/// All other text is kept verbatim and in order. The reservation lines are appended at
/// the end. Callers must check availability first: the rewrite itself does not.
pub fn mark_reserved(blob: &str, reservation: &Reservation) -> String {
    let available = marker(STATE_KEY, SlotState::Available.as_str());
    let reserved = marker(STATE_KEY, SlotState::Reserved.as_str());
    let mut lines: Vec<String> = blob
        .lines()
        .map(|line| match line.split_once('=') {
            Some((key, value))
                if key.trim() == STATE_KEY
                    && value.trim() == SlotState::Available.as_str() =>
            {
                reserved.clone()
            }
            _ => line.replace(&available, &reserved),
        })
        .collect();
    lines.extend(reservation_lines(reservation));
    lines.join("\n")
}

/// Label of a freshly created slot: `"<prefix> - <service>"`, or just the prefix.
pub fn available_label(summary_prefix: Option<&str>, service: Option<&str>) -> String {
    let prefix = summary_prefix
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_SUMMARY_PREFIX);
    match service.map(str::trim).filter(|s| !s.is_empty()) {
        Some(service) => format!("{} - {}", prefix, service),
        None => prefix.to_string(),
    }
}

pub fn reserved_label(customer_name: &str) -> String {
    format!("{} - {}", RESERVED_PREFIX, sanitize(customer_name))
}
