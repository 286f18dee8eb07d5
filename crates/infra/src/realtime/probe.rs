//! Push endpoint availability probe
//!
//! A single HEAD request against the push endpoint. Anything but 404
//! counts as available: servers without the websocket route answer 404,
//! while servers that have it tend to answer 400 or 405 to a plain HTTP
//! request.

use std::time::Duration;

use async_trait::async_trait;
use caresync_core::realtime::CapabilityProbe;
use caresync_domain::Result;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::http::HttpClient;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// HEAD-based [`CapabilityProbe`]
pub struct HttpProbe {
    http: HttpClient,
    url: String,
}

impl HttpProbe {
    /// Accepts the push URL as configured; `ws`/`wss` schemes are probed
    /// over plain `http`/`https`.
    pub fn new(http: HttpClient, url: impl Into<String>) -> Self {
        Self { http, url: http_equivalent(url.into()) }
    }

    /// Probe with its own short-timeout, single-attempt client.
    pub fn with_defaults(url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder().timeout(PROBE_TIMEOUT).max_attempts(1).build()?;
        Ok(Self::new(http, url))
    }
}

fn http_equivalent(url: String) -> String {
    if let Some(rest) = url.strip_prefix("wss://") {
        return format!("https://{rest}");
    }
    if let Some(rest) = url.strip_prefix("ws://") {
        return format!("http://{rest}");
    }
    url
}

#[async_trait]
impl CapabilityProbe for HttpProbe {
    async fn check(&self) -> bool {
        let request = self.http.request(Method::HEAD, self.url.as_str());
        match self.http.send(request).await {
            Ok(response) => {
                let available = response.status() != StatusCode::NOT_FOUND;
                debug!(status = %response.status(), available, "push endpoint probe answered");
                available
            }
            Err(err) => {
                warn!(error = %err, "push endpoint probe failed");
                false
            }
        }
    }
}
