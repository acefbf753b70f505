//! Cancellation Channel
//!
//! Out-of-band stop request for a session's generation, independent of the
//! stream channel's state. The server reacts by emitting a terminal event
//! on the still-open channel; this call never touches the channel itself.

use raggen_core::SessionId;

use crate::http::build_request_client;
use crate::types::{StreamAck, StreamConfig, StreamError, StreamResult};

/// Issues `DELETE /stream/{sessionId}` stop requests.
pub struct CancellationChannel {
    client: reqwest::Client,
    config: StreamConfig,
}

impl CancellationChannel {
    pub fn new(config: StreamConfig) -> Self {
        let client = build_request_client(config.request_timeout);
        Self { client, config }
    }

    /// Wraps an existing reqwest client (shared connection pools, tests).
    pub fn with_client(client: reqwest::Client, config: StreamConfig) -> Self {
        Self { client, config }
    }

    /// Asks the server to abort generation for the session.
    ///
    /// Valid whether or not the stream channel is still open. The caller
    /// must tolerate the acknowledgement arriving before or after the
    /// terminal event on the channel.
    pub async fn cancel(&self, session: &SessionId) -> StreamResult<StreamAck> {
        let url = self.config.endpoint(&format!("stream/{session}"))?;

        let response = self.client.delete(url).send().await?;
        let status = response.status().as_u16();

        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Http { status, body });
        }

        let ack: StreamAck = response
            .json()
            .await
            .map_err(|e| StreamError::InvalidResponse(format!("cancel ack: {e}")))?;

        tracing::debug!(
            "stream cancel acknowledged: session={} message={}",
            session,
            ack.message
        );

        Ok(ack)
    }
}
