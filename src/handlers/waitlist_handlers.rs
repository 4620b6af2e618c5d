use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::responses::{internal_error, malformed_json};
use crate::repositories::submission_store::StoreError;
use crate::validation::{self, ValidationError};
use crate::AppState;

#[derive(Deserialize)]
pub struct WaitlistRequest {
    // Missing email falls through to the syntax check instead of a 422.
    #[serde(default)]
    email: String,
}

/// POST /api/waitlist (application/json).
pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    request: Result<Json<WaitlistRequest>, JsonRejection>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // Undecodable bodies get the same {success, code, message} shape as
    // every other rejection instead of axum's plain-text default.
    let Json(request) = request.map_err(|e| malformed_json(&e.body_text()))?;

    let email = validation::normalize_email(&request.email).map_err(|e| e.into_rejection())?;

    // Friendly early answer for the common case. The unique index on the
    // insert below stays authoritative for concurrent signups.
    let exists = state
        .submission_store
        .waitlist_email_exists(&email)
        .map_err(|e| {
            tracing::error!("Database error while checking waitlist email: {}", e);
            internal_error()
        })?;
    if exists {
        return Err(ValidationError::EmailAlreadyRegistered.into_rejection());
    }

    match state.submission_store.insert_waitlist_entry(&email) {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Successfully joined the waitlist!",
        }))),
        Err(StoreError::DuplicateEmail) => {
            Err(ValidationError::EmailAlreadyRegistered.into_rejection())
        }
        Err(e) => {
            tracing::error!("Database error while inserting waitlist entry: {}", e);
            Err(internal_error())
        }
    }
}

/// GET /api/waitlist. Count plus a few member initials for social proof.
pub async fn get_waitlist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (count, initials) = state.submission_store.waitlist_summary().map_err(|e| {
        tracing::error!("Database error while reading waitlist summary: {}", e);
        internal_error()
    })?;
    Ok(Json(json!({
        "success": true,
        "count": count,
        "initials": initials,
    })))
}
