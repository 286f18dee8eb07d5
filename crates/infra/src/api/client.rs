//! HTTP client wrapper for the clinic REST API
//!
//! Joins the retrying [`HttpClient`] with the backend's conventions:
//! base-URL prefixing, bearer authentication whenever a session is active,
//! JSON bodies, and extraction of the human-readable message the backend
//! puts in its error payloads.

use std::sync::Arc;
use std::time::Duration;

use caresync_core::AccessTokenProvider;
use caresync_domain::constants::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use caresync_domain::{CareSyncError, ClientConfig, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::errors::conversions::status_code_error;
use crate::http::HttpClient;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl From<&ClientConfig> for ApiClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout: Duration::from_secs(config.api.timeout_seconds),
        }
    }
}

/// API client speaking the backend's REST conventions
pub struct ApiClient {
    http: Arc<HttpClient>,
    tokens: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiClientConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(3)
            .default_headers(headers)
            .build()?;

        Ok(Self { http: Arc::new(http), tokens, config })
    }

    /// Execute a GET request.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.send_json(self.request(Method::GET, path)).await
    }

    /// Execute a GET request with query parameters.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<R> {
        self.send_json(self.request(Method::GET, path).query(query)).await
    }

    /// Execute a POST request with a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    /// Execute a PATCH request with a JSON body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(self.request(Method::PATCH, path).json(body)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let mut builder = self.http.request(method, url);
        // Anonymous endpoints (login, refresh) are called without a session;
        // the bearer header is attached only once a token exists.
        if let Some(token) = self.tokens.access_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send_json<R: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<R> {
        let response = self.http.send(builder).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        // 204/205 have no body by spec; only types that deserialize from
        // null (e.g. unit) can be requested from such endpoints.
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                CareSyncError::Internal(format!(
                    "no-content response ({}) cannot populate the expected type",
                    status.as_u16()
                ))
            });
        }

        response
            .json()
            .await
            .map_err(|e| CareSyncError::Internal(format!("Failed to parse response: {}", e)))
    }

    /// Turn a non-success response into a domain error, preferring the
    /// message the backend embeds in its error payloads over the bare
    /// status line.
    async fn status_error(status: StatusCode, response: Response) -> CareSyncError {
        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body).unwrap_or_else(|| {
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            )
        });
        debug!(status = status.as_u16(), %message, "API request failed");
        status_code_error(status.as_u16(), message)
    }
}

/// Pull the `message` or `detail` field out of a backend error payload.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail"]
        .iter()
        .find_map(|field| value.get(field).and_then(|v| v.as_str()))
        .map(str::to_string)
}
