//! HTTP Client Factory
//!
//! Two client profiles: ordinary request/response calls carry an overall
//! timeout, while the SSE connection must stay open for the whole
//! generation and therefore only bounds connection establishment.

use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for trigger, cancellation, and lookup calls.
pub fn build_request_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build reqwest client")
}

/// Client for the long-lived event stream. No overall timeout.
pub fn build_stream_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build reqwest client")
}
