//! Cooldown-gated alert delivery.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::alerts::AlertLedger;
use crate::config::NotifierConfig;
use crate::health::Verdict;
use crate::notify::message::compose;
use crate::notify::transport::{MailgunTransport, NotificationTransport};

/// What happened to one notify call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Message delivered and recorded in the ledger.
    Sent,
    /// Service alerted within the cooldown window.
    Suppressed,
    /// Transport not configured.
    Disabled,
    /// Transport failed; nothing recorded, next cycle retries.
    Failed,
}

enum Delivery {
    Active {
        transport: Arc<dyn NotificationTransport>,
        recipients: Vec<String>,
    },
    Disabled(&'static str),
}

/// Sends alerts for failing verdicts, at most once per cooldown per service.
pub struct Notifier {
    delivery: Delivery,
    ledger: Arc<AlertLedger>,
}

impl Notifier {
    /// Build from configuration. Missing credentials or recipients yield a
    /// disabled notifier and a single warning.
    pub fn from_config(config: &NotifierConfig, ledger: Arc<AlertLedger>) -> Self {
        if !config.has_credentials() {
            return Self::disabled("Mailgun API key or domain not configured", ledger);
        }
        match MailgunTransport::new(config) {
            Ok(transport) => Self::new(Arc::new(transport), config.recipients.clone(), ledger),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build mail client");
                Self::disabled("mail client could not be built", ledger)
            }
        }
    }

    /// Build around an explicit transport.
    pub fn new(
        transport: Arc<dyn NotificationTransport>,
        recipients: Vec<String>,
        ledger: Arc<AlertLedger>,
    ) -> Self {
        if recipients.is_empty() {
            return Self::disabled("Admin emails not configured", ledger);
        }
        Self {
            delivery: Delivery::Active {
                transport,
                recipients,
            },
            ledger,
        }
    }

    fn disabled(reason: &'static str, ledger: Arc<AlertLedger>) -> Self {
        tracing::warn!(reason, "Email alerts disabled");
        Self {
            delivery: Delivery::Disabled(reason),
            ledger,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.delivery, Delivery::Active { .. })
    }

    pub fn recipient_count(&self) -> usize {
        match &self.delivery {
            Delivery::Active { recipients, .. } => recipients.len(),
            Delivery::Disabled(_) => 0,
        }
    }

    pub fn ledger(&self) -> &Arc<AlertLedger> {
        &self.ledger
    }

    pub async fn notify(&self, verdict: &Verdict) -> NotifyOutcome {
        self.notify_at(verdict, Utc::now()).await
    }

    /// Notify as of `now`: check cooldown, send, then record.
    pub async fn notify_at(&self, verdict: &Verdict, now: DateTime<Utc>) -> NotifyOutcome {
        let (transport, recipients) = match &self.delivery {
            Delivery::Active {
                transport,
                recipients,
            } => (transport, recipients),
            Delivery::Disabled(reason) => {
                tracing::debug!(service = %verdict.name, reason, "Skipping email alert");
                return NotifyOutcome::Disabled;
            }
        };

        if !self.ledger.should_alert(&verdict.name, now) {
            tracing::info!(service = %verdict.name, "Alert cooldown active, skipping email");
            return NotifyOutcome::Suppressed;
        }

        let message = compose(verdict, now, self.ledger.cooldown());
        match transport.send(recipients, &message.subject, &message.html).await {
            Ok(()) => {
                tracing::info!(
                    service = %verdict.name,
                    recipients = recipients.len(),
                    "Alert email sent"
                );
                self.ledger
                    .record_alert(&verdict.name, now, &verdict.status, &verdict.failure_detail())
                    .await;
                NotifyOutcome::Sent
            }
            Err(e) => {
                tracing::error!(service = %verdict.name, error = %e, "Error sending email alert");
                NotifyOutcome::Failed
            }
        }
    }
}
