//! Probes and the mail transport against local mock servers.

use std::time::Duration;

use healthwatch::config::NotifierConfig;
use healthwatch::notify::{MailgunTransport, NotificationTransport, TransportError};
use healthwatch::probe::{DockerRuntime, EndpointProbe, HttpEndpointProbe, ProcessProbe};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{start_mock_engine, start_programmable_backend};

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_http_probe_ok() {
    let addr = start_programmable_backend(|| async { (200, "{}".to_string()) }).await;
    let probe = HttpEndpointProbe::new();

    assert!(probe.probe_http(&format!("http://{}/health", addr), TIMEOUT).await);
}

#[tokio::test]
async fn test_http_probe_non_200() {
    let unavailable = start_programmable_backend(|| async { (503, "down".to_string()) }).await;
    let redirect = start_programmable_backend(|| async { (301, String::new()) }).await;
    let probe = HttpEndpointProbe::new();

    assert!(!probe.probe_http(&format!("http://{}/health", unavailable), TIMEOUT).await);
    assert!(!probe.probe_http(&format!("http://{}/health", redirect), TIMEOUT).await);
}

#[tokio::test]
async fn test_http_probe_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let probe = HttpEndpointProbe::new();
    assert!(!probe.probe_http(&format!("http://{}/health", addr), TIMEOUT).await);
}

#[tokio::test]
async fn test_http_probe_timeout() {
    let addr = start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        (200, "{}".to_string())
    })
    .await;
    let probe = HttpEndpointProbe::new();

    assert!(
        !probe
            .probe_http(&format!("http://{}/health", addr), Duration::from_millis(100))
            .await
    );
}

#[tokio::test]
async fn test_docker_runtime_states() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("docker.sock");
    start_mock_engine(&socket, |path| match path {
        "/containers/web/json" => (
            200,
            r#"{"Id":"1","State":{"Status":"running","Running":true,"StartedAt":"2024-05-01T10:00:00Z","Health":{"Status":"healthy"}}}"#
                .to_string(),
        ),
        "/containers/broken/json" => (500, r#"{"message":"boom"}"#.to_string()),
        _ => (404, r#"{"message":"No such container"}"#.to_string()),
    });

    let runtime = DockerRuntime::new(&socket, TIMEOUT);

    let web = runtime.probe_process("web").await;
    assert!(web.running);
    assert_eq!(web.status, "running");
    assert_eq!(web.health.as_deref(), Some("healthy"));
    assert!(web.is_ready());

    let missing = runtime.probe_process("ghost").await;
    assert!(!missing.running);
    assert_eq!(missing.status, "not_found");
    assert_eq!(missing.error.as_deref(), Some("Container not found"));

    let broken = runtime.probe_process("broken").await;
    assert!(!broken.running);
    assert_eq!(broken.status, "error");
    assert!(broken.error.is_some());
}

fn notifier_config(base: &str) -> NotifierConfig {
    NotifierConfig {
        mailgun_api_key: "key-123".into(),
        mailgun_domain: "mg.example.com".into(),
        mailgun_api_base: base.to_string(),
        recipients: vec!["ops@example.com".into(), "dev@example.com".into()],
        ..NotifierConfig::default()
    }
}

#[tokio::test]
async fn test_mailgun_send() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/messages"))
        .and(header("authorization", "Basic YXBpOmtleS0xMjM="))
        .and(body_string_contains("to=ops%40example.com"))
        .and(body_string_contains("to=dev%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"message":"Queued"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = notifier_config(&server.uri());
    let transport = MailgunTransport::new(&config).unwrap();
    transport
        .send(&config.recipients, "⚠️ ALERT: web is DOWN", "<p>down</p>")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_mailgun_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let config = notifier_config(&server.uri());
    let transport = MailgunTransport::new(&config).unwrap();
    let err = transport
        .send(&config.recipients, "subject", "<p>x</p>")
        .await
        .unwrap_err();

    match err {
        TransportError::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Forbidden");
        }
        other => panic!("unexpected error: {other}"),
    }
}
