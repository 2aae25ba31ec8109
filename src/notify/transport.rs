//! Outbound notification transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::NotifierConfig;

/// Errors from a single send attempt.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mail API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail API rejected the message: {status} - {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers one message to every recipient. No retries inside.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, html: &str) -> Result<(), TransportError>;
}

/// Mailgun HTTP API transport.
#[derive(Debug, Clone)]
pub struct MailgunTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl MailgunTransport {
    pub fn new(config: &NotifierConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v3/{}/messages",
                config.mailgun_api_base.trim_end_matches('/'),
                config.mailgun_domain
            ),
            api_key: config.mailgun_api_key.clone(),
            from: config.from.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationTransport for MailgunTransport {
    async fn send(&self, recipients: &[String], subject: &str, html: &str) -> Result<(), TransportError> {
        let mut form: Vec<(&str, &str)> = vec![("from", self.from.as_str()), ("subject", subject), ("html", html)];
        form.extend(recipients.iter().map(|r| ("to", r.as_str())));

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
