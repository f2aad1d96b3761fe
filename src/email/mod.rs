//! Outbound email: the transport seam and the template renderer.

mod render;

pub use render::EmailRenderer;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;

use crate::config::Config;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Delivers through the Resend HTTP API.
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: &str, from: &str) -> Result<Self, MailError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let body = json!({
            "from": self.from,
            "to": message.to,
            "subject": message.subject,
            "html": message.html,
        });
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!("Resend accepted message to {}", message.to.join(", "));
        Ok(())
    }
}

/// Used when no API key is configured. Nothing leaves the process.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            "[log-only] would send \"{}\" to {} ({} bytes)",
            message.subject,
            message.to.join(", "),
            message.html.len()
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &Config) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.resend_api_key {
        Some(key) => Ok(Arc::new(ResendMailer::new(key, &config.from_email)?)),
        None => {
            tracing::warn!("RESEND_API_KEY not set, emails will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every message; addresses listed in `fail_for` get a transport
    /// rejection instead.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<EmailMessage>>,
        pub fail_for: Vec<String>,
    }

    impl RecordingMailer {
        pub fn failing_for(addresses: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            }
        }

        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
            if message.to.iter().any(|to| self.fail_for.contains(to)) {
                return Err(MailError::Rejected {
                    status: 422,
                    body: "rejected by test".to_string(),
                });
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }
}
