//! Dashboard routes served straight from the router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use healthwatch::alerts::AlertLedger;
use healthwatch::config::ServiceSpec;
use healthwatch::dashboard::{setup_dashboard_router, DashboardState};
use healthwatch::health::{evaluate, Observation, StatusBoard, StatusSnapshot};
use healthwatch::probe::ProcessStatus;
use serde_json::Value;
use tower::ServiceExt;

fn state() -> DashboardState {
    DashboardState {
        board: StatusBoard::new(),
        ledger: Arc::new(AlertLedger::in_memory(chrono::Duration::minutes(60))),
    }
}

async fn get(state: &DashboardState, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = setup_dashboard_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(state: &DashboardState, uri: &str) -> Value {
    let (status, body) = get(state, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let json = get_json(&state(), "/health").await;
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn test_index_serves_html() {
    let (status, body) = get(&state(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("/api/status"));
}

#[tokio::test]
async fn test_status_before_first_cycle() {
    let json = get_json(&state(), "/api/status").await;

    assert!(json["timestamp"].is_null());
    assert!(json["last_check"].is_null());
    assert_eq!(json["services"], serde_json::json!({}));
    assert_eq!(json["summary"]["total"], 0);
}

#[tokio::test]
async fn test_status_after_cycle() {
    let state = state();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let web = ServiceSpec::new("web", "Frontend");
    let db = ServiceSpec::new("db", "Database");
    let verdicts = vec![
        evaluate(&web, &Observation::new("web", ProcessStatus::running(Some("healthy")))),
        evaluate(&db, &Observation::new("db", ProcessStatus::not_found())),
    ];
    state.board.publish(StatusSnapshot::new(now, verdicts));

    let json = get_json(&state, "/api/status").await;

    assert_eq!(json["last_check"], "2024-05-01 12:00:00");
    assert_eq!(json["summary"]["healthy"], 1);
    assert_eq!(json["summary"]["unhealthy"], 1);
    assert_eq!(json["summary"]["total"], 2);
    assert_eq!(json["services"]["web"]["healthy"], true);
    assert_eq!(json["services"]["web"]["health"], "healthy");
    assert_eq!(json["services"]["db"]["status"], "not_found");
    assert!(json["services"]["web"].get("http_healthy").is_none());
}

#[tokio::test]
async fn test_status_lists_services_in_configuration_order() {
    let state = state();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let verdicts = ["sonarr", "gluetun", "plex"].map(|id| {
        evaluate(&ServiceSpec::new(id, id), &Observation::new(id, ProcessStatus::running(None)))
    });
    state.board.publish(StatusSnapshot::new(now, verdicts));

    let (status, body) = get(&state, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    let body = String::from_utf8(body).unwrap();

    let sonarr = body.find(r#""sonarr":{"#).unwrap();
    let gluetun = body.find(r#""gluetun":{"#).unwrap();
    let plex = body.find(r#""plex":{"#).unwrap();
    assert!(sonarr < gluetun && gluetun < plex);
}

#[tokio::test]
async fn test_history_lists_recorded_alerts() {
    let state = state();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    state
        .ledger
        .record_alert("db", t0, "not_found", "Container is not running")
        .await;
    state.ledger.record_alert(
        "web",
        t0 + chrono::Duration::minutes(15),
        "running",
        "Container running but HTTP endpoint not responding",
    )
    .await;

    let json = get_json(&state, "/api/history").await;

    assert_eq!(json["total"], 2);
    let alerts = json["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["service"], "db");
    assert_eq!(alerts[1]["service"], "web");
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(&state(), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
