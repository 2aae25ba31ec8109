//! Shared fakes and mock servers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use healthwatch::notify::{NotificationTransport, TransportError};
use healthwatch::probe::{EndpointProbe, ProcessProbe, ProcessStatus};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UnixListener};

/// Runtime whose answers are set per service. Unknown services are not found.
#[derive(Default)]
pub struct ScriptedRuntime {
    statuses: Mutex<HashMap<String, ProcessStatus>>,
    pub calls: AtomicUsize,
}

impl ScriptedRuntime {
    pub fn set(&self, id: &str, status: ProcessStatus) {
        self.statuses.lock().unwrap().insert(id.to_string(), status);
    }
}

#[async_trait]
impl ProcessProbe for ScriptedRuntime {
    async fn probe_process(&self, service_id: &str) -> ProcessStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .get(service_id)
            .cloned()
            .unwrap_or_else(ProcessStatus::not_found)
    }
}

/// HTTP probe with per-URL answers. Unknown URLs are unreachable.
#[derive(Default)]
pub struct ScriptedHttp {
    reachable: Mutex<HashMap<String, bool>>,
    pub probed: Mutex<Vec<String>>,
}

impl ScriptedHttp {
    pub fn set(&self, url: &str, reachable: bool) {
        self.reachable.lock().unwrap().insert(url.to_string(), reachable);
    }
}

#[async_trait]
impl EndpointProbe for ScriptedHttp {
    async fn probe_http(&self, url: &str, _timeout: Duration) -> bool {
        self.probed.lock().unwrap().push(url.to_string());
        self.reachable.lock().unwrap().get(url).copied().unwrap_or(false)
    }
}

/// Transport that records subjects and can be told to fail.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(Vec<String>, String)>>,
    pub fail: AtomicBool,
}

impl RecordingTransport {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, recipients: &[String], subject: &str, _html: &str) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected {
                status: 503,
                body: "try later".into(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipients.to_vec(), subject.to_string()));
        Ok(())
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        301 => "301 Moved Permanently",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

fn raw_response(status: u16, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line(status),
        body.len(),
        body
    )
}

/// Start a programmable HTTP backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let (status, body) = f().await;
                        let _ = socket.write_all(raw_response(status, &body).as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a fake container engine on a unix socket. `f` maps the request
/// path to a status and JSON body.
pub fn start_mock_engine<F>(socket: &Path, f: F)
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = UnixListener::bind(socket).unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                        let (status, body) = f(&path);
                        let _ = socket.write_all(raw_response(status, &body).as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
