//! Cold-boot readiness gate.
//!
//! Holds monitoring back after the whole environment (re)starts so that
//! services still initializing do not trigger "service is down" alerts.
//!
//! # Timeline
//! ```text
//! entry ── cold boot ──┬─ poll ─ poll ─ ... ─┬─ grace ─▶ Ready
//!                      │                     │
//!                      └──── until max_wait ─┴─────────▶ TimedOut
//! ```
//!
//! # Design Decisions
//! - The max-wait budget counts from gate entry, cold boot included
//! - A poll sleep never overshoots the remaining budget
//! - The gate cannot fail; timing out still lets monitoring start

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{sleep, Instant};

use crate::config::ReadinessConfig;
use crate::probe::ProcessProbe;

/// How the gate was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Enough services came up.
    Ready { ready: usize, total: usize },
    /// The budget ran out first. `ready` is the last observed count.
    TimedOut { ready: usize, total: usize },
}

pub struct ReadinessGate {
    services: Vec<String>,
    runtime: Arc<dyn ProcessProbe>,
    config: ReadinessConfig,
}

impl ReadinessGate {
    pub fn new(services: Vec<String>, runtime: Arc<dyn ProcessProbe>, config: ReadinessConfig) -> Self {
        Self {
            services,
            runtime,
            config,
        }
    }

    fn threshold_met(&self, ready: usize) -> bool {
        ready as f64 >= self.services.len() as f64 * self.config.ready_ratio
    }

    /// Number of services running and, if they define a healthcheck,
    /// reporting healthy.
    pub async fn count_ready(&self) -> usize {
        join_all(self.services.iter().map(|id| self.runtime.probe_process(id)))
            .await
            .iter()
            .filter(|status| status.is_ready())
            .count()
    }

    /// Block until enough services are up or the budget is spent.
    pub async fn wait(&self) -> GateOutcome {
        let start = Instant::now();
        let total = self.services.len();
        let max_wait = Duration::from_secs(self.config.max_wait_secs);
        let poll = Duration::from_secs(self.config.poll_interval_secs);
        let cold_boot = Duration::from_secs(self.config.cold_boot_secs);

        tracing::info!(
            cold_boot_secs = self.config.cold_boot_secs,
            max_wait_secs = self.config.max_wait_secs,
            "Waiting for services to initialize (cold boot protection)"
        );
        sleep(cold_boot.min(max_wait)).await;

        let mut ready = 0;
        loop {
            let elapsed = start.elapsed();
            if elapsed >= max_wait {
                tracing::warn!(
                    ready,
                    total,
                    max_wait_secs = self.config.max_wait_secs,
                    "Readiness timeout, starting monitoring anyway"
                );
                return GateOutcome::TimedOut { ready, total };
            }

            ready = self.count_ready().await;
            tracing::info!(ready, total, elapsed_secs = elapsed.as_secs(), "Services ready");

            if self.threshold_met(ready) {
                tracing::info!(
                    ready,
                    total,
                    grace_secs = self.config.grace_secs,
                    "Ready to monitor, waiting grace period"
                );
                sleep(Duration::from_secs(self.config.grace_secs)).await;
                return GateOutcome::Ready { ready, total };
            }

            let remaining = max_wait.saturating_sub(start.elapsed());
            sleep(poll.min(remaining)).await;
        }
    }
}
