//! Container state lookup through the Docker Engine API.
//!
//! # Responsibilities
//! - Speak HTTP/1.1 over the engine's unix socket
//! - Map `GET /containers/{name}/json` onto a `ProcessStatus`
//! - Turn every failure into a non-running status
//!
//! A fresh connection is opened per lookup; the socket is local and a
//! cycle makes one request per service.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::{Request, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use thiserror::Error;
use tokio::net::UnixStream;
use tokio::time;

use crate::probe::{ProcessProbe, ProcessStatus};

/// Errors talking to the container runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("cannot connect to {path}: {source}")]
    Connect {
        path: String,
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("engine API returned {0}")]
    Status(StatusCode),

    #[error("unexpected inspect payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerInspect {
    state: ContainerState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerState {
    #[serde(default)]
    running: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    started_at: Option<String>,
    #[serde(default)]
    health: Option<ContainerHealth>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerHealth {
    status: String,
}

impl From<ContainerState> for ProcessStatus {
    fn from(state: ContainerState) -> Self {
        Self {
            running: state.running,
            status: state.status,
            health: state.health.map(|h| h.status),
            started_at: state.started_at,
            error: None,
        }
    }
}

/// `ProcessProbe` backed by a Docker-compatible engine socket.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    socket: PathBuf,
    timeout: Duration,
}

impl DockerRuntime {
    pub fn new(socket: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket: socket.into(),
            timeout,
        }
    }

    /// Inspect a container. `Ok(None)` means the engine does not know it.
    async fn inspect(&self, name: &str) -> Result<Option<ContainerState>, RuntimeError> {
        let stream = UnixStream::connect(&self.socket)
            .await
            .map_err(|source| RuntimeError::Connect {
                path: self.socket.display().to_string(),
                source,
            })?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "engine connection closed with error");
            }
        });

        let request = Request::builder()
            .method("GET")
            .uri(format!("/containers/{}/json", name))
            .header("host", "docker")
            .header("user-agent", "healthwatch")
            .body(Empty::<Bytes>::new())?;

        let response = sender.send_request(request).await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(RuntimeError::Status(status)),
            _ => {}
        }

        let body = response.into_body().collect().await?.to_bytes();
        let inspect: ContainerInspect = serde_json::from_slice(&body)?;
        Ok(Some(inspect.state))
    }
}

#[async_trait]
impl ProcessProbe for DockerRuntime {
    async fn probe_process(&self, service_id: &str) -> ProcessStatus {
        let result = match time::timeout(self.timeout, self.inspect(service_id)).await {
            Ok(result) => result,
            Err(_) => Err(RuntimeError::Timeout(self.timeout)),
        };

        match result {
            Ok(Some(state)) => state.into(),
            Ok(None) => {
                tracing::warn!(service = %service_id, "container not found");
                ProcessStatus::not_found()
            }
            Err(e) => {
                tracing::warn!(service = %service_id, error = %e, "container lookup failed");
                ProcessStatus::lookup_failed(e.to_string())
            }
        }
    }
}
