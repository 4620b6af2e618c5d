use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// Generic 500 body. Store and notifier failures are logged at the handler
/// boundary and collapsed to this; internal detail never reaches the client.
pub fn internal_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "code": "INTERNAL_ERROR",
            "message": "Something went wrong. Please try again.",
        })),
    )
}

pub fn malformed_json(detail: &str) -> (StatusCode, Json<Value>) {
    tracing::warn!("Failed to parse request body: {}", detail);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "code": "MALFORMED_JSON",
            "message": "Invalid request body",
        })),
    )
}

pub fn malformed_form(detail: &str) -> (StatusCode, Json<Value>) {
    tracing::warn!("Failed to process form data: {}", detail);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "code": "MALFORMED_FORM",
            "message": "Failed to process form data",
        })),
    )
}
