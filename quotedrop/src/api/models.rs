use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response to a successful upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Public path the stored file is served at
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveEmailRequest {
    pub email: String,
}

/// Accepts both the single-address and the bulk delete variants.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DeleteEmailRequest {
    Single { email: String },
    Bulk { emails: Vec<String> },
}

impl DeleteEmailRequest {
    pub fn into_emails(self) -> Vec<String> {
        match self {
            Self::Single { email } => vec![email],
            Self::Bulk { emails } => emails,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteEmailResponse {
    pub message: String,
    /// Recipient list after the deletion
    pub emails: Vec<String>,
}
