//! Stream Transport Types
//!
//! Configuration, error taxonomy, and the cancellation acknowledgement for
//! the RagGen transport layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default timeout for ordinary request/response calls.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default API base when none is configured.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/rag-genai";

/// Configuration for the streaming service endpoints.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Base URL of the generation API, e.g. `https://host/api/rag-genai`.
    pub base_url: Url,
    /// Timeout applied to trigger/cancel/lookup calls. The SSE connection
    /// itself is long-lived and carries no overall timeout.
    pub request_timeout: Duration,
}

impl StreamConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Builds a configuration from a base URL string.
    pub fn from_base(base_url: &str) -> StreamResult<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| StreamError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        Ok(Self::new(url))
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// Plain string joining (rather than `Url::join`) so a base with or
    /// without a trailing slash behaves the same.
    pub fn endpoint(&self, path: &str) -> StreamResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| StreamError::InvalidEndpoint(format!("{joined}: {e}")))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"))
    }
}

/// Acknowledgement body of the cancellation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamAck {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Errors that can occur in the transport layer.
#[derive(Error, Debug)]
pub enum StreamError {
    /// HTTP request failed at the connection level.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status code.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Failed to parse a response body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Endpoint path could not be resolved against the base URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for StreamError {
    fn from(err: reqwest::Error) -> Self {
        StreamError::Network(err.to_string())
    }
}

/// Result type alias for transport errors
pub type StreamResult<T> = Result<T, StreamError>;
