// --- File: crates/slotify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;     // Error handling
pub mod http;      // HTTP utilities
pub mod services;  // Store abstractions
pub mod logging;   // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    SlotifyError,
    HttpStatusCode,
    config_error,
    validation_error,
    internal_error,
};

// Re-export HTTP utilities for easier access
pub use http::{error_body, IntoHttpResponse};

// Re-export store abstractions used by every calendar backend
pub use services::{
    BoxFuture, CalendarStore, ItemPatch, ItemQuery, NewItem, StoreError, StoreItem,
};

// This crate provides functionality shared across the workspace: the calendar store
// contract, error-to-status mapping and logging setup.
