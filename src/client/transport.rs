//! Transport layer for A2A client communication.
//!
//! Provides the `Transport` trait for abstracting over how envelopes travel,
//! and `JsonRpcTransport` for JSON-RPC over HTTP.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::error::{A2AError, A2AResult};
use crate::types::{A2AMessage, A2AResponse};

/// Transport abstraction for A2A communication.
///
/// Implementations send one request envelope and return the response
/// envelope. Failures before a response envelope exists are normalized into
/// the client-side [`A2AError`] variants.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request envelope and receive the response envelope.
    async fn send(&self, message: &A2AMessage) -> A2AResult<A2AResponse>;
}

/// Configuration for [`JsonRpcTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout. Defaults to 60 seconds.
    pub timeout: Duration,
    /// Additional HTTP headers to include on every request.
    pub headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            headers: HashMap::new(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest` client honouring this configuration.
    ///
    /// Headers whose name or value is not valid HTTP are skipped.
    pub fn build_client(&self) -> reqwest::Client {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &self.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(val)) => {
                    default_headers.insert(name, val);
                }
                _ => warn!(header = %key, "Skipping invalid header"),
            }
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(default_headers)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, timeout = ?self.timeout, "Failed to build HTTP client, using defaults without timeout or headers");
                reqwest::Client::new()
            })
    }
}

/// Map a `reqwest` send failure onto the client error variants.
pub(crate) fn map_send_error(e: reqwest::Error, url: &str) -> A2AError {
    if e.is_timeout() {
        A2AError::Timeout(format!("Request to {url} timed out: {e}"))
    } else if e.is_connect() {
        A2AError::Transport(format!("Connection failed: {url}: {e}"))
    } else {
        A2AError::Transport(format!("Request to {url} failed: {e}"))
    }
}

/// JSON-RPC over HTTP transport using `reqwest`.
///
/// Sends POST requests with `Content-Type: application/json`. A non-2xx
/// response whose body is still a JSON-RPC error envelope is returned as
/// that envelope, so the remote error code survives.
///
/// # Example
///
/// ```no_run
/// use agentforge_a2a::client::JsonRpcTransport;
///
/// let transport = JsonRpcTransport::new("http://localhost:8000/a2a");
/// ```
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcTransport {
    /// Create a new transport targeting the given endpoint URL.
    ///
    /// Uses default configuration (60s timeout, no extra headers).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(url, TransportConfig::default())
    }

    /// Create a new transport with custom configuration.
    pub fn with_config(url: impl Into<String>, config: TransportConfig) -> Self {
        Self {
            client: config.build_client(),
            url: url.into(),
        }
    }

    /// Create a new transport with an existing `reqwest::Client`.
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Returns the URL this transport sends requests to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn send(&self, message: &A2AMessage) -> A2AResult<A2AResponse> {
        debug!(method = %message.method, url = %self.url, "Sending A2A request");

        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| map_send_error(e, &self.url))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| A2AError::Transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_slice::<A2AResponse>(&bytes) {
                if envelope.error.is_some() {
                    debug!(status = status.as_u16(), "Error envelope on non-success status");
                    return Ok(envelope);
                }
            }
            return Err(A2AError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| A2AError::InvalidJson(format!("Invalid JSON response: {e}")))
    }
}
