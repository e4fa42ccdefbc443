use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data: malformed email address, missing file part
    #[error("{message}")]
    Validation { message: String },

    /// Email address is already present in the recipient list
    #[error("{message}")]
    Duplicate { message: String },

    /// Requested resource not found
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// Underlying read/write/append failure on the upload directory or the
    /// recipient file
    #[error(transparent)]
    Storage(#[from] std::io::Error),

    /// A per-recipient call to the email delivery API failed. Never surfaced
    /// to HTTP callers; logged during the notification fan-out.
    #[error("delivery to {recipient} failed: {message}")]
    Upstream { recipient: String, message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } | Error::Duplicate { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Storage(_) | Error::Upstream { .. } | Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking paths or I/O details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } | Error::Duplicate { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} {id} not found"),
            Error::Storage(_) => "Storage error".to_string(),
            Error::Upstream { .. } | Error::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Storage(_) | Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Upstream { .. } => {
                tracing::warn!("Upstream delivery error: {}", self);
            }
            Error::Duplicate { .. } => {
                tracing::warn!("Duplicate recipient: {}", self);
            }
            Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "message": self.user_message() }))).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
