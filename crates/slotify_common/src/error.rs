use std::fmt;
use thiserror::Error;

/// The base error type for failures outside the slot core (startup, wiring, configuration).
///
/// Domain crates keep their own error enums and implement [`HttpStatusCode`] for them;
/// this type covers everything that is not a per-request domain outcome.
#[derive(Error, Debug)]
pub enum SlotifyError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred while talking to the calendar provider during startup
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// Implemented by every error type that can reach the HTTP boundary so that
/// status selection lives next to the error definition, not in the handlers.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;

    /// Stable machine-readable name of the error kind.
    fn kind(&self) -> &'static str;
}

impl HttpStatusCode for SlotifyError {
    fn status_code(&self) -> u16 {
        match self {
            SlotifyError::ConfigError(_) => 500,
            SlotifyError::ValidationError(_) => 400,
            SlotifyError::ExternalServiceError { .. } => 502,
            SlotifyError::InternalError(_) => 500,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SlotifyError::ConfigError(_) => "config_error",
            SlotifyError::ValidationError(_) => "validation_error",
            SlotifyError::ExternalServiceError { .. } => "external_service_error",
            SlotifyError::InternalError(_) => "internal_error",
        }
    }
}

impl From<std::io::Error> for SlotifyError {
    fn from(err: std::io::Error) -> Self {
        SlotifyError::InternalError(err.to_string())
    }
}

impl From<slotify_config::ConfigValueError> for SlotifyError {
    fn from(err: slotify_config::ConfigValueError) -> Self {
        SlotifyError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> SlotifyError {
    SlotifyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> SlotifyError {
    SlotifyError::ValidationError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> SlotifyError {
    SlotifyError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(config_error("x").status_code(), 500);
        assert_eq!(validation_error("x").status_code(), 400);
        assert_eq!(internal_error("x").status_code(), 500);
        let external = SlotifyError::ExternalServiceError {
            service_name: "Google Calendar".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(external.status_code(), 502);
        assert_eq!(external.kind(), "external_service_error");
    }

    #[test]
    fn test_config_value_error_conversion() {
        let err: SlotifyError =
            slotify_config::ConfigValueError::UnknownTimeZone("Nowhere/Land".into()).into();
        assert!(matches!(err, SlotifyError::ConfigError(ref m) if m.contains("Nowhere/Land")));
    }
}
