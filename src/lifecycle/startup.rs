//! Startup orchestration.
//!
//! # Order
//! 1. Load the alert ledger (cooldowns survive restarts)
//! 2. Start the dashboard so status is reachable during the readiness wait
//! 3. Readiness gate (skippable; a shutdown signal cuts it short)
//! 4. Scheduler, until a shutdown signal
//!
//! Only binding the dashboard listener can fail; everything after the
//! gate runs until asked to stop.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::alerts::AlertLedger;
use crate::config::HealthwatchConfig;
use crate::dashboard::{self, DashboardState};
use crate::health::{GateOutcome, HealthMonitor, ReadinessGate, StatusBoard};
use crate::lifecycle::{signals::wait_for_signal, Shutdown};
use crate::notify::Notifier;
use crate::probe::{DockerRuntime, HttpEndpointProbe, ProcessProbe};

/// Switches that come from the command line rather than the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub skip_readiness: bool,
}

fn log_banner(config: &HealthwatchConfig, notifier: &Notifier) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        check_interval_mins = config.monitor.check_interval_mins,
        cooldown_mins = config.monitor.cooldown_mins,
        services = config.services.len(),
        admin_emails = notifier.recipient_count(),
        alerts_enabled = notifier.is_enabled(),
        "HealthWatch starting"
    );
}

/// Run the readiness gate unless `stop` resolves first. `None` means the
/// process was asked to stop before the gate finished.
async fn wait_ready_or_stop(gate: &ReadinessGate, stop: impl Future<Output = ()>) -> Option<GateOutcome> {
    tokio::select! {
        outcome = gate.wait() => {
            tracing::info!(?outcome, "Readiness gate finished");
            Some(outcome)
        }
        _ = stop => {
            tracing::info!("Shutdown requested during readiness wait");
            None
        }
    }
}

/// Run the monitor until SIGINT/SIGTERM.
pub async fn run(config: HealthwatchConfig, options: RunOptions) -> std::io::Result<()> {
    let ledger = Arc::new(AlertLedger::load(
        &config.storage.state_file,
        config.monitor.cooldown(),
        &config.service_ids(),
    ));
    let notifier = Notifier::from_config(&config.notifier, ledger.clone());
    log_banner(&config, &notifier);

    let board = StatusBoard::new();
    let runtime: Arc<dyn ProcessProbe> = Arc::new(DockerRuntime::new(
        &config.runtime.docker_socket,
        config.runtime.probe_timeout(),
    ));
    let shutdown = Shutdown::new();

    let dashboard = if config.dashboard.enabled {
        let listener = TcpListener::bind(&config.dashboard.bind_address).await?;
        let state = DashboardState {
            board: board.clone(),
            ledger: ledger.clone(),
        };
        Some(tokio::spawn(dashboard::serve(listener, state, shutdown.subscribe())))
    } else {
        tracing::info!("Dashboard disabled");
        None
    };

    let mut stop_requested = false;
    if options.skip_readiness {
        tracing::info!("Readiness gate skipped");
    } else {
        let gate = ReadinessGate::new(config.service_ids(), runtime.clone(), config.readiness.clone());
        stop_requested = wait_ready_or_stop(&gate, wait_for_signal()).await.is_none();
    }

    let scheduler = if stop_requested {
        None
    } else {
        let monitor = HealthMonitor::new(
            config.services.clone(),
            runtime,
            Arc::new(HttpEndpointProbe::new()),
            board,
            notifier,
        )
        .with_interval(config.monitor.check_interval())
        .with_http_timeout(config.runtime.http_timeout());

        let handle = tokio::spawn(monitor.run(shutdown.subscribe()));
        wait_for_signal().await;
        Some(handle)
    };

    tracing::info!("Shutting down");
    shutdown.trigger();

    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Scheduler task failed");
        }
    }
    if let Some(handle) = dashboard {
        match handle.await {
            Ok(Err(e)) => tracing::error!(error = %e, "Dashboard server error"),
            Err(e) => tracing::error!(error = %e, "Dashboard task failed"),
            Ok(Ok(())) => {}
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
