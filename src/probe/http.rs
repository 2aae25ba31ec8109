//! HTTP endpoint probing.
//!
//! A probe is a single GET. Anything other than a 200 inside the timeout
//! (connection refused, DNS failure, timeout, redirect, 5xx) is "unreachable".

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::probe::EndpointProbe;

/// Probe backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpEndpointProbe {
    client: Client<HttpConnector, Body>,
}

impl HttpEndpointProbe {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }
}

impl Default for HttpEndpointProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EndpointProbe for HttpEndpointProbe {
    async fn probe_http(&self, url: &str, timeout: Duration) -> bool {
        let request = match Request::builder()
            .method("GET")
            .uri(url)
            .header("user-agent", "healthwatch-probe")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "HTTP probe skipped: bad request URI");
                return false;
            }
        };

        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let ok = response.status() == StatusCode::OK;
                if !ok {
                    tracing::debug!(url = %url, status = %response.status(), "HTTP probe: non-200 status");
                }
                ok
            }
            Ok(Err(e)) => {
                tracing::debug!(url = %url, error = %e, "HTTP probe: connection error");
                false
            }
            Err(_) => {
                tracing::debug!(url = %url, timeout = ?timeout, "HTTP probe: timeout");
                false
            }
        }
    }
}
