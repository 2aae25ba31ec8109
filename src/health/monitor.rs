//! Check cycle scheduler.
//!
//! # Responsibilities
//! - Run a check cycle on a fixed interval until shutdown
//! - Observe every configured service, evaluate, publish the snapshot
//! - Hand failing verdicts to the notifier

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::ServiceSpec;
use crate::health::evaluator::{evaluate, observe};
use crate::health::snapshot::{StatusBoard, StatusSnapshot};
use crate::notify::{Notifier, NotifyOutcome};
use crate::probe::{EndpointProbe, ProcessProbe};

pub struct HealthMonitor {
    services: Arc<[ServiceSpec]>,
    runtime: Arc<dyn ProcessProbe>,
    http: Arc<dyn EndpointProbe>,
    http_timeout: Duration,
    interval: Duration,
    board: StatusBoard,
    notifier: Notifier,
}

impl HealthMonitor {
    pub fn new(
        services: Vec<ServiceSpec>,
        runtime: Arc<dyn ProcessProbe>,
        http: Arc<dyn EndpointProbe>,
        board: StatusBoard,
        notifier: Notifier,
    ) -> Self {
        Self {
            services: services.into(),
            runtime,
            http,
            http_timeout: Duration::from_secs(5),
            interval: Duration::from_secs(15 * 60),
            board,
            notifier,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    /// Run cycles until shutdown. The first cycle starts immediately; an
    /// overrunning cycle pushes the next one back instead of stacking.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            services = self.services.len(),
            "Scheduler started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    pub async fn run_cycle(&self) -> Arc<StatusSnapshot> {
        self.run_cycle_at(Utc::now()).await
    }

    /// One complete cycle as of `now`.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Arc<StatusSnapshot> {
        tracing::info!("Running service health checks");

        let observations = join_all(
            self.services
                .iter()
                .map(|spec| observe(spec, self.runtime.as_ref(), self.http.as_ref(), self.http_timeout)),
        )
        .await;

        let verdicts: Vec<_> = self
            .services
            .iter()
            .zip(&observations)
            .map(|(spec, observation)| evaluate(spec, observation))
            .collect();

        self.board.publish(StatusSnapshot::new(now, verdicts.iter().cloned()));

        let mut failed = Vec::new();
        for verdict in verdicts.iter().filter(|v| !v.healthy) {
            tracing::warn!(
                service = %verdict.name,
                status = %verdict.status,
                health = %verdict.health,
                http_healthy = ?verdict.http_healthy,
                "Service is unhealthy"
            );
            failed.push(verdict.name.as_str());

            if self.notifier.notify_at(verdict, now).await == NotifyOutcome::Failed {
                tracing::warn!(service = %verdict.name, "Alert not delivered, will retry next cycle");
            }
        }

        if failed.is_empty() {
            tracing::info!(services = verdicts.len(), "All services healthy");
        } else {
            tracing::warn!(unhealthy = %failed.join(", "), "Unhealthy services");
        }

        self.board.load()
    }
}
