// --- File: crates/slotify_gcal/src/extract.rs ---
//! Request extractors whose rejections use the JSON error envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;

use crate::error::SlotError;

/// `Json<T>` that rejects with `SlotError::Validation`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(SlotError))]
pub struct ApiJson<T>(pub T);

/// `Query<T>` that rejects with `SlotError::Validation`.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(SlotError))]
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for SlotError {
    fn from(rejection: JsonRejection) -> Self {
        SlotError::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for SlotError {
    fn from(rejection: QueryRejection) -> Self {
        SlotError::validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}
