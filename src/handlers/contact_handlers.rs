use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::handlers::responses::{internal_error, malformed_form};
use crate::utils::email::ContactNotifier;
use crate::validation::{self, ContactFields, UploadedFile};
use crate::AppState;

/// POST /api/contact (multipart/form-data).
///
/// Linear per-request pipeline: decode, validate (fail fast, pre-side-effect),
/// persist, notify, respond. The notification is best-effort: once the row is
/// written the client gets a success whether or not the email went out.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut fields = ContactFields::default();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed_form(&e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "fullName" => {
                fields.full_name = field
                    .text()
                    .await
                    .map_err(|e| malformed_form(&e.to_string()))?;
            }
            "email" => {
                fields.email = field
                    .text()
                    .await
                    .map_err(|e| malformed_form(&e.to_string()))?;
            }
            "subject" => {
                fields.subject = field
                    .text()
                    .await
                    .map_err(|e| malformed_form(&e.to_string()))?;
            }
            "projectDetails" => {
                fields.project_details = field
                    .text()
                    .await
                    .map_err(|e| malformed_form(&e.to_string()))?;
            }
            "contactType" => {
                fields.contact_type = field
                    .text()
                    .await
                    .map_err(|e| malformed_form(&e.to_string()))?;
            }
            // The basic form posts a single "attachment", the rich form
            // posts repeated "attachments" parts.
            "attachment" | "attachments" => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| malformed_form(&e.to_string()))?;
                // Browsers submit an empty part for untouched file inputs.
                if data.is_empty() {
                    continue;
                }
                files.push(UploadedFile {
                    name: file_name,
                    content_type,
                    data,
                });
            }
            _ => continue,
        }
    }

    let contact = validation::validate_contact(&fields).map_err(|e| e.into_rejection())?;
    validation::validate_files(&files).map_err(|e| e.into_rejection())?;

    let has_attachment = !files.is_empty();
    let attachment_name = files.first().map(|f| f.name.clone());
    state
        .submission_store
        .create_contact_submission(&contact, has_attachment, attachment_name)
        .map_err(|e| {
            tracing::error!("Database error while saving contact submission: {}", e);
            internal_error()
        })?;

    if let Err(e) = state.notifier.send_contact_notification(&contact, &files) {
        // Persistence is the source of truth; a lost email is logged, not
        // surfaced.
        tracing::error!("Contact notification failed: {}", e);
    }

    Ok(Json(json!({
        "success": true,
        "message": "Message sent successfully! We will get back to you soon.",
    })))
}
