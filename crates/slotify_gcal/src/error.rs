// --- File: crates/slotify_gcal/src/error.rs ---
use axum::response::{IntoResponse, Response};
use serde_json::json;
use slotify_common::{error_body, HttpStatusCode, SlotifyError, StoreError};
use thiserror::Error;

/// Every way a slot operation can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Malformed or contradictory request shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The agenda name could not be resolved to a calendar.
    #[error("Unknown agenda: {}", requested.as_deref().unwrap_or("<none configured>"))]
    UnknownAgenda {
        requested: Option<String>,
        valid: Vec<String>,
    },

    /// The referenced item does not exist in the agenda's calendar.
    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    /// The item exists but does not carry the managed-slot marker.
    #[error("Item {0} is not a managed slot")]
    NotASlot(String),

    /// The slot exists but is no longer available.
    #[error("Slot {0} is not available")]
    SlotAlreadyReserved(String),

    /// The backing store failed or did not answer in time.
    #[error("Calendar store unavailable: {message}")]
    StoreUnavailable { message: String, timed_out: bool },
}

impl SlotError {
    pub fn validation(message: impl Into<String>) -> Self {
        SlotError::Validation(message.into())
    }

    pub(crate) fn unavailable(message: impl Into<String>) -> Self {
        SlotError::StoreUnavailable {
            message: message.into(),
            timed_out: false,
        }
    }

    pub(crate) fn timed_out(message: impl Into<String>) -> Self {
        SlotError::StoreUnavailable {
            message: message.into(),
            timed_out: true,
        }
    }

    /// Maps a store failure observed while working on `item_id`.
    pub(crate) fn from_store(err: StoreError, item_id: Option<&str>) -> Self {
        match (err, item_id) {
            (StoreError::NotFound(_), Some(id)) => SlotError::SlotNotFound(id.to_string()),
            (other, _) => SlotError::unavailable(other.to_string()),
        }
    }
}

impl HttpStatusCode for SlotError {
    fn status_code(&self) -> u16 {
        match self {
            SlotError::Validation(_) => 400,
            SlotError::UnknownAgenda { .. } => 400,
            SlotError::SlotNotFound(_) => 404,
            SlotError::NotASlot(_) => 400,
            SlotError::SlotAlreadyReserved(_) => 409,
            SlotError::StoreUnavailable { timed_out: true, .. } => 504,
            SlotError::StoreUnavailable { .. } => 502,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SlotError::Validation(_) => "validation_error",
            SlotError::UnknownAgenda { .. } => "unknown_agenda",
            SlotError::SlotNotFound(_) => "slot_not_found",
            SlotError::NotASlot(_) => "not_a_slot",
            SlotError::SlotAlreadyReserved(_) => "slot_already_reserved",
            SlotError::StoreUnavailable { .. } => "store_unavailable",
        }
    }
}

impl IntoResponse for SlotError {
    fn into_response(self) -> Response {
        let extra = match &self {
            SlotError::UnknownAgenda { valid, .. } => Some(json!({ "valid": valid })),
            _ => None,
        };
        error_body(&self, extra).into_response()
    }
}

/// Convert SlotError to SlotifyError for callers outside the HTTP layer.
impl From<SlotError> for SlotifyError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::StoreUnavailable { message, .. } => SlotifyError::ExternalServiceError {
                service_name: "Calendar store".to_string(),
                message,
            },
            SlotError::UnknownAgenda { .. } => SlotifyError::ConfigError(err.to_string()),
            other => SlotifyError::ValidationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(SlotError::validation("x").status_code(), 400);
        assert_eq!(SlotError::SlotNotFound("a".into()).status_code(), 404);
        assert_eq!(SlotError::NotASlot("a".into()).status_code(), 400);
        assert_eq!(SlotError::SlotAlreadyReserved("a".into()).status_code(), 409);
        assert_eq!(SlotError::unavailable("down").status_code(), 502);
        assert_eq!(SlotError::timed_out("slow").status_code(), 504);
        assert_eq!(
            SlotError::UnknownAgenda {
                requested: Some("x".into()),
                valid: vec![]
            }
            .status_code(),
            400
        );
    }

    #[test]
    fn test_not_found_maps_to_slot_not_found_only_with_an_id() {
        let err = SlotError::from_store(StoreError::NotFound("gone".into()), Some("evt1"));
        assert_eq!(err, SlotError::SlotNotFound("evt1".into()));

        let err = SlotError::from_store(StoreError::NotFound("calendar".into()), None);
        assert!(matches!(err, SlotError::StoreUnavailable { timed_out: false, .. }));

        let err = SlotError::from_store(StoreError::Rejected("quota".into()), Some("evt1"));
        assert!(matches!(err, SlotError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_unknown_agenda_message() {
        let err = SlotError::UnknownAgenda {
            requested: None,
            valid: vec!["a".into()],
        };
        assert_eq!(err.to_string(), "Unknown agenda: <none configured>");
    }
}
