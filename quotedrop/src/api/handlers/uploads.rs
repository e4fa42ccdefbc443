use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::AppState;
use crate::api::models::UploadResponse;
use crate::errors::{Error, Result};

#[utoipa::path(
    post,
    path = "/uploadFile",
    tag = "uploads",
    summary = "Upload file",
    description = "Store one multipart file under a date-stamped name and notify every stored recipient of its URL. \
                   The response reports that delivery was initiated, not its outcome.",
    request_body(
        content_type = "multipart/form-data",
        description = "Single `file` field carrying the upload"
    ),
    responses(
        (status = 200, description = "File stored, notification fan-out started", body = UploadResponse),
        (status = 400, description = "No file uploaded"),
        (status = 413, description = "Payload too large"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    let mut stored = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::Validation {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        if field.name() != Some("file") {
            // Ignore unknown fields (forward compatibility)
            continue;
        }

        let original = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(|e| Error::Validation {
            message: format!("Failed to read file field: {e}"),
        })?;

        stored = Some(state.uploads.save(&original, &bytes).await?);
        // One file per request: stop at the first `file` field
        break;
    }

    let stored = stored.ok_or_else(|| Error::Validation {
        message: "No file uploaded".to_string(),
    })?;

    tracing::info!(file = %stored.public_path, "Uploaded file");

    // Snapshot the recipient list now; the detached fan-out task must not
    // observe mutations made after this response is sent.
    let recipients = state.recipients.list().await?;
    let notifier = state.notifier.clone();
    let public_path = stored.public_path.clone();
    tokio::spawn(async move {
        let summary = notifier.send_upload_notifications(&recipients, &public_path).await;
        tracing::info!(
            attempted = summary.attempted,
            failed = summary.failed,
            file = %public_path,
            "Notification fan-out finished"
        );
    });

    Ok(Json(UploadResponse {
        message: "File uploaded successfully, emails are being sent".to_string(),
        file: stored.public_path,
    }))
}
