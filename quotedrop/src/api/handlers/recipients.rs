use axum::{Json, extract::State};

use crate::AppState;
use crate::api::models::{DeleteEmailRequest, DeleteEmailResponse, MessageResponse, SaveEmailRequest};
use crate::errors::{Error, Result};

#[utoipa::path(
    post,
    path = "/saveEmail",
    tag = "recipients",
    summary = "Add recipient",
    description = "Append an email address to the recipient list. Rejects malformed addresses and duplicates.",
    request_body = SaveEmailRequest,
    responses(
        (status = 200, description = "Email saved", body = MessageResponse),
        (status = 400, description = "Invalid or duplicate email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_email(State(state): State<AppState>, Json(req): Json<SaveEmailRequest>) -> Result<Json<MessageResponse>> {
    if req.email.trim().is_empty() {
        return Err(Error::Validation {
            message: "No email provided".to_string(),
        });
    }

    state.recipients.add(&req.email).await?;

    Ok(Json(MessageResponse {
        message: "Email saved successfully".to_string(),
    }))
}

#[utoipa::path(
    delete,
    path = "/deleteEmail",
    tag = "recipients",
    summary = "Remove recipients",
    description = "Remove one address (`{\"email\": ...}`) or several (`{\"emails\": [...]}`) from the recipient list. \
                   Also accepts POST for clients that cannot send DELETE bodies.",
    request_body = DeleteEmailRequest,
    responses(
        (status = 200, description = "Updated recipient list", body = DeleteEmailResponse),
        (status = 400, description = "No email provided"),
        (status = 404, description = "No matching address stored"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_email(
    State(state): State<AppState>,
    Json(req): Json<DeleteEmailRequest>,
) -> Result<Json<DeleteEmailResponse>> {
    let emails: Vec<String> = req
        .into_emails()
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();

    if emails.is_empty() {
        return Err(Error::Validation {
            message: "No email provided".to_string(),
        });
    }

    let remaining = state.recipients.remove(&emails).await?;

    Ok(Json(DeleteEmailResponse {
        message: "Email deleted successfully".to_string(),
        emails: remaining,
    }))
}

#[utoipa::path(
    get,
    path = "/emails.txt",
    tag = "recipients",
    summary = "List recipients",
    description = "The stored recipient list as raw newline-delimited text. An empty list yields an empty body.",
    responses(
        (status = 200, description = "Newline-delimited addresses", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_emails(State(state): State<AppState>) -> Result<String> {
    let emails = state.recipients.list().await?;

    let mut body = emails.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    Ok(body)
}
