//! Read-only dashboard and JSON API.
//!
//! Handlers only read the status board and the alert ledger; they never
//! wait on the scheduler.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::alerts::AlertLedger;
use crate::health::StatusBoard;
use self::handlers::*;

/// Shared read handles injected into handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub board: StatusBoard,
    pub ledger: Arc<AlertLedger>,
}

pub fn setup_dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/status", get(api_status))
        .route("/api/history", get(api_history))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the dashboard until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    state: DashboardState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    tracing::info!(address = %listener.local_addr()?, "Dashboard listening");

    axum::serve(listener, setup_dashboard_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Dashboard stopped");
    Ok(())
}
