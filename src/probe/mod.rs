//! Probe adapters: the only code that talks to the outside world
//! during a check cycle.
//!
//! # Data Flow
//! ```text
//! ServiceSpec
//!     → ProcessProbe (docker.rs: container state via the Engine API)
//!     → EndpointProbe (http.rs: GET, 200 or bust), only if running
//!     → Observation (health::evaluator)
//! ```
//!
//! # Design Decisions
//! - Probes never return errors; failures fold into the observation
//! - One attempt per cycle, bounded by a timeout, no retries
//! - Traits at the seam so the scheduler and gate run against fakes in tests

pub mod docker;
pub mod http;

use std::time::Duration;

use async_trait::async_trait;

pub use docker::DockerRuntime;
pub use http::HttpEndpointProbe;

/// Status text used when the runtime has no unit with the requested name.
pub const NOT_FOUND: &str = "not_found";

/// Status text used when the runtime could not be queried at all.
pub const LOOKUP_ERROR: &str = "error";

/// What the container runtime reports for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStatus {
    pub running: bool,
    /// Runtime state string ("running", "exited", "not_found", ...).
    pub status: String,
    /// Dedicated healthcheck result, absent when none is defined.
    pub health: Option<String>,
    pub started_at: Option<String>,
    /// Lookup failure detail.
    pub error: Option<String>,
}

impl ProcessStatus {
    pub fn running(health: Option<&str>) -> Self {
        Self {
            running: true,
            status: "running".to_string(),
            health: health.map(String::from),
            started_at: None,
            error: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            running: false,
            status: NOT_FOUND.to_string(),
            health: None,
            started_at: None,
            error: Some("Container not found".to_string()),
        }
    }

    pub fn lookup_failed(error: impl Into<String>) -> Self {
        Self {
            running: false,
            status: LOOKUP_ERROR.to_string(),
            health: None,
            started_at: None,
            error: Some(error.into()),
        }
    }

    /// Running and either without a healthcheck or reporting healthy.
    pub fn is_ready(&self) -> bool {
        self.running && self.health.as_deref().map_or(true, |h| h == "healthy")
    }
}

/// Container runtime query facility.
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// Look up a unit by name. Lookup failures come back as a
    /// non-running status, never as an error.
    async fn probe_process(&self, service_id: &str) -> ProcessStatus;
}

/// HTTP reachability facility.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// True only for a 200 response within `timeout`.
    async fn probe_http(&self, url: &str, timeout: Duration) -> bool;
}
