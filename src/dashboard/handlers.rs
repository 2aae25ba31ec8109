use axum::{extract::State, response::Html, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alerts::{AlertRecord, RECENT_LIMIT};
use crate::dashboard::DashboardState;
use crate::health::{StatusSummary, VerdictMap};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct StatusResponse {
    /// When the snapshot was taken; null before the first cycle.
    pub timestamp: Option<DateTime<Utc>>,
    /// In configuration order.
    pub services: VerdictMap,
    pub summary: StatusSummary,
    pub last_check: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub alerts: Vec<AlertRecord>,
    pub total: u64,
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("dashboard.html"))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

pub async fn api_status(State(state): State<DashboardState>) -> Json<StatusResponse> {
    let snapshot = state.board.load();

    Json(StatusResponse {
        timestamp: snapshot.taken_at,
        services: snapshot.services.clone(),
        summary: snapshot.summary(),
        last_check: snapshot
            .taken_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    })
}

pub async fn api_history(State(state): State<DashboardState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        alerts: state.ledger.recent(RECENT_LIMIT),
        total: state.ledger.total_alerts(),
    })
}
