//! HealthWatch: container health monitor with cooldown-gated email alerts.
//!
//! # Architecture Overview
//!
//! ```text
//! readiness gate ──▶ scheduler (every check interval)
//!                      │
//!                      ├─▶ probe: docker socket / HTTP GET
//!                      ├─▶ evaluator ──▶ status board ◀──── dashboard /api/status
//!                      └─▶ notifier ──▶ Mailgun
//!                             │
//!                             └─▶ alert ledger ──▶ state file
//!                                      ▲
//!                                      └──────────── dashboard /api/history
//! ```

use std::path::PathBuf;

use clap::Parser;

use healthwatch::config::load_config;
use healthwatch::lifecycle::{self, RunOptions};
use healthwatch::observability::init_logging;

#[derive(Parser)]
#[command(name = "healthwatch")]
#[command(about = "Monitors containers and emails operators when they go down", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "HEALTHWATCH_CONFIG", default_value = "healthwatch.toml")]
    config: PathBuf,

    /// Start checking immediately instead of waiting for services to come up.
    #[arg(long)]
    skip_readiness: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .map_err(|e| format!("failed to load {}: {}", cli.config.display(), e))?;

    init_logging(&config.observability);
    tracing::info!(path = %cli.config.display(), "Configuration loaded");

    lifecycle::run(
        config,
        RunOptions {
            skip_readiness: cli.skip_readiness,
        },
    )
    .await?;

    Ok(())
}
