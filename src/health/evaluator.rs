//! Healthy/unhealthy decision for one service in one cycle.
//!
//! # Decision Rule
//! ```text
//! not running             → unhealthy (HTTP result ignored)
//! running + healthcheck   → healthy iff health == "healthy"
//! running, no healthcheck → healthy
//! running + http_check    → previous AND http reachable
//! ```

use serde::Serialize;

use crate::config::ServiceSpec;
use crate::probe::{EndpointProbe, ProcessProbe, ProcessStatus, NOT_FOUND};

/// Raw facts gathered for one service in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub service: String,
    pub process: ProcessStatus,
    /// Present only when the service declares a probe URL and was running.
    pub http_reachable: Option<bool>,
}

impl Observation {
    pub fn new(service: impl Into<String>, process: ProcessStatus) -> Self {
        Self {
            service: service.into(),
            process,
            http_reachable: None,
        }
    }

    pub fn with_http(mut self, reachable: bool) -> Self {
        self.http_reachable = Some(reachable);
        self
    }
}

/// Gather an observation: process lookup first, then the HTTP probe if
/// the service declares one and its process is running.
pub async fn observe(
    spec: &ServiceSpec,
    runtime: &dyn ProcessProbe,
    http: &dyn EndpointProbe,
    http_timeout: std::time::Duration,
) -> Observation {
    let process = runtime.probe_process(&spec.id).await;
    let mut observation = Observation::new(spec.id.clone(), process);

    if observation.process.running {
        if let Some(url) = &spec.http_check {
            let reachable = http.probe_http(url, http_timeout).await;
            if !reachable {
                tracing::warn!(service = %spec.id, url = %url, "HTTP endpoint not responding");
            }
            observation.http_reachable = Some(reachable);
        }
    }

    observation
}

/// Verdict for one service, as published in the status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub name: String,
    pub description: String,
    pub healthy: bool,
    pub running: bool,
    pub status: String,
    /// Healthcheck result or "N/A".
    pub health: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_healthy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Verdict {
    /// One-line explanation used in alert messages and history.
    pub fn failure_detail(&self) -> String {
        if !self.running {
            "Container is not running".to_string()
        } else if self.http_healthy == Some(false) {
            "Container running but HTTP endpoint not responding".to_string()
        } else {
            self.error
                .clone()
                .unwrap_or_else(|| "Service is not responding".to_string())
        }
    }
}

/// Apply the decision rule.
pub fn evaluate(spec: &ServiceSpec, observation: &Observation) -> Verdict {
    let process = &observation.process;

    let (healthy, status, http_healthy) = if !process.running {
        let status = if process.status.is_empty() {
            NOT_FOUND.to_string()
        } else {
            process.status.clone()
        };
        (false, status, None)
    } else {
        let mut healthy = match process.health.as_deref() {
            Some(health) => health == "healthy",
            None => true,
        };
        let http_healthy = spec.http_check.as_ref().map(|_| observation.http_reachable == Some(true));
        if let Some(reachable) = http_healthy {
            healthy = healthy && reachable;
        }
        (healthy, process.status.clone(), http_healthy)
    };

    Verdict {
        name: spec.id.clone(),
        description: spec.description.clone(),
        healthy,
        running: process.running,
        status,
        health: process.health.clone().unwrap_or_else(|| "N/A".to_string()),
        http_healthy,
        started_at: process.started_at.clone(),
        error: process.error.clone(),
    }
}
