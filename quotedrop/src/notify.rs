//! Best-effort notification fan-out to the email delivery API.
//!
//! After an upload, one independent request is issued per stored recipient.
//! A failed call is logged and skipped; there are no retries and the outcome
//! is never reported back to the uploading client.

use serde::Serialize;
use url::Url;

use crate::config::EmailConfig;
use crate::errors::Error;

/// Fixed request shape expected by the delivery endpoint (EmailJS-style).
#[derive(Debug, Serialize)]
struct EmailSendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    to_name: &'a str,
    from_name: &'a str,
    from_email: &'a str,
    attachment_url: &'a str,
    message: &'a str,
}

/// Outcome of one fan-out pass. Informational only: upload callers learn
/// that delivery was initiated, never how it went.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanoutSummary {
    pub attempted: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct Notifier {
    http: reqwest::Client,
    email: EmailConfig,
    public_url: Url,
}

impl Notifier {
    pub fn new(email: EmailConfig, public_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            email,
            public_url,
        }
    }

    /// Send one notification per recipient for the file served at
    /// `public_path`. Individual failures are logged and do not stop the loop.
    pub async fn send_upload_notifications(&self, recipients: &[String], public_path: &str) -> FanoutSummary {
        if recipients.is_empty() {
            tracing::info!("No recipients stored, skipping notification fan-out");
            return FanoutSummary::default();
        }

        let attachment_url = format!("{}{}", self.public_url.as_str().trim_end_matches('/'), public_path);

        let mut summary = FanoutSummary::default();
        for recipient in recipients {
            summary.attempted += 1;
            match self.send_one(recipient, &attachment_url).await {
                Ok(()) => {
                    tracing::info!(recipient = %recipient, "Notification email sent");
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(recipient = %recipient, error = %e, "Failed to send notification email");
                }
            }
        }

        summary
    }

    async fn send_one(&self, recipient: &str, attachment_url: &str) -> Result<(), Error> {
        let body = EmailSendRequest {
            service_id: &self.email.service_id,
            template_id: &self.email.template_id,
            user_id: &self.email.user_id,
            template_params: TemplateParams {
                to_name: recipient,
                from_name: &self.email.from_name,
                from_email: &self.email.from_email,
                attachment_url,
                message: &self.email.message,
            },
        };

        self.http
            .post(self.email.api_url.clone())
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::Upstream {
                recipient: recipient.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
