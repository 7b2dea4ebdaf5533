use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::error::{HttpStatusCode, SlotifyError};

/// Builds the JSON error envelope shared by every endpoint:
/// `{"error": {"message", "code", "kind", ...extra}}`.
///
/// `extra` entries are merged into the inner object; non-object values are ignored.
pub fn error_body<E>(err: &E, extra: Option<Value>) -> (StatusCode, Json<Value>)
where
    E: HttpStatusCode + std::fmt::Display,
{
    let status_code =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut inner = Map::new();
    inner.insert("message".to_string(), Value::String(err.to_string()));
    inner.insert("code".to_string(), json!(status_code.as_u16()));
    inner.insert("kind".to_string(), Value::String(err.kind().to_string()));
    if let Some(Value::Object(fields)) = extra {
        inner.extend(fields);
    }

    (status_code, Json(json!({ "error": Value::Object(inner) })))
}

/// Extension trait to convert an error into an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for SlotifyError {
    fn into_http_response(self) -> Response {
        error_body(&self, None).into_response()
    }
}

/// Implement IntoResponse for SlotifyError to make it easier to use in Axum handlers.
impl IntoResponse for SlotifyError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::validation_error;

    #[test]
    fn test_error_body_shape() {
        let err = validation_error("end must be after start");
        let (status, Json(body)) = error_body(&err, Some(json!({ "field": "end" })));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["kind"], "validation_error");
        assert_eq!(body["error"]["field"], "end");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("end must be after start"));
    }

    #[test]
    fn test_non_object_extra_ignored() {
        let err = validation_error("x");
        let (_, Json(body)) = error_body(&err, Some(json!(["ignored"])));
        assert_eq!(body["error"].as_object().unwrap().len(), 3);
    }
}
