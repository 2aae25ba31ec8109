//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the health monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HealthwatchConfig {
    /// Check cadence and alert cooldown.
    pub monitor: MonitorConfig,

    /// Monitored services, in evaluation order.
    pub services: Vec<ServiceSpec>,

    /// Container runtime and probe settings.
    pub runtime: RuntimeConfig,

    /// Alert delivery settings.
    pub notifier: NotifierConfig,

    /// Durable alert state location.
    pub storage: StorageConfig,

    /// Cold-boot readiness gate timing.
    pub readiness: ReadinessConfig,

    /// Dashboard / JSON API listener.
    pub dashboard: DashboardConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl HealthwatchConfig {
    /// Identifiers of every configured service, in configuration order.
    pub fn service_ids(&self) -> Vec<String> {
        self.services.iter().map(|s| s.id.clone()).collect()
    }
}

/// A single monitored service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Unique identifier, also the container name queried at the runtime.
    pub id: String,

    /// Human-readable description shown in alerts and the dashboard.
    #[serde(default)]
    pub description: String,

    /// Optional URL that must answer 200 for the service to count as healthy.
    #[serde(default)]
    pub http_check: Option<String>,
}

impl ServiceSpec {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            http_check: None,
        }
    }

    pub fn with_http_check(mut self, url: impl Into<String>) -> Self {
        self.http_check = Some(url.into());
        self
    }
}

/// Check cycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Minutes between check cycles.
    pub check_interval_mins: u64,

    /// Minimum minutes between two alerts for the same service.
    pub cooldown_mins: u64,
}

/// Upper bound for minute-valued settings: one year.
pub const MAX_MINUTES: u64 = 365 * 24 * 60;

impl MonitorConfig {
    /// Clamped to `MAX_MINUTES`; validation rejects larger values.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_mins.min(MAX_MINUTES) * 60)
    }

    /// Clamped to `MAX_MINUTES`; validation rejects larger values.
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cooldown_mins.min(MAX_MINUTES) as i64)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_mins: 15,
            cooldown_mins: 60,
        }
    }
}

/// Container runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the Docker Engine API unix socket.
    pub docker_socket: String,

    /// Timeout for a single container lookup in seconds.
    pub probe_timeout_secs: u64,

    /// Timeout for a single HTTP probe in seconds.
    pub http_timeout_secs: u64,
}

impl RuntimeConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            docker_socket: "/var/run/docker.sock".to_string(),
            probe_timeout_secs: 5,
            http_timeout_secs: 5,
        }
    }
}

/// Mailgun notification configuration.
///
/// Missing credentials or recipients are not an error: the notifier
/// degrades to a no-op instead.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub mailgun_api_key: String,
    pub mailgun_domain: String,

    /// Base URL of the Mailgun API (overridable for EU region or tests).
    pub mailgun_api_base: String,

    /// Sender address.
    pub from: String,

    /// Alert recipients.
    pub recipients: Vec<String>,

    /// Timeout for one send call in seconds.
    pub send_timeout_secs: u64,
}

impl NotifierConfig {
    /// Both Mailgun credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.mailgun_api_key.trim().is_empty() && !self.mailgun_domain.trim().is_empty()
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            mailgun_api_key: String::new(),
            mailgun_domain: String::new(),
            mailgun_api_base: "https://api.mailgun.net".to_string(),
            from: "healthwatch@serenity.watch".to_string(),
            recipients: Vec::new(),
            send_timeout_secs: 10,
        }
    }
}

/// Durable state configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding cooldown timestamps and alert history.
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: "/data/healthwatch_state.json".to_string(),
        }
    }
}

/// Readiness gate timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Unconditional wait before the first poll.
    pub cold_boot_secs: u64,

    /// Delay between readiness polls.
    pub poll_interval_secs: u64,

    /// Fraction of services that must be up (0, 1].
    pub ready_ratio: f64,

    /// Extra wait once the ratio is reached.
    pub grace_secs: u64,

    /// Total budget measured from gate entry, cold boot included.
    pub max_wait_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            cold_boot_secs: 120,
            poll_interval_secs: 15,
            ready_ratio: 0.8,
            grace_secs: 30,
            max_wait_secs: 900,
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Serve the dashboard and JSON API.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:8888").
    pub bind_address: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:8888".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable text.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
