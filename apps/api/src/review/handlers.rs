//! Axum route handlers for the Review API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::review::parser::FeedbackRecord;
use crate::review::reviewer::review_resume;
use crate::state::AppState;

/// Multipart field carrying the resume document.
const RESUME_FIELD: &str = "resume";

/// GET /
pub async fn handle_home() -> Json<Value> {
    Json(json!({ "message": "Resume Analyzer API Running" }))
}

/// POST /analyze_resume
///
/// Accepts a multipart upload with a `resume` file part and returns the
/// structured feedback record.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FeedbackRecord>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            // Drain unrelated parts.
            field.bytes().await?;
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((file_name, data));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("No file part in the request".to_string()))?;
    if file_name.trim().is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} byte limit",
            state.config.max_upload_bytes
        )));
    }

    let request_id = Uuid::new_v4();
    let span = info_span!("analyze_resume", %request_id);
    async move {
        info!("Reviewing '{}' ({} bytes)", file_name, data.len());
        let record = review_resume(&state, &data).await?;
        Ok::<_, AppError>(Json(record))
    }
    .instrument(span)
    .await
}
