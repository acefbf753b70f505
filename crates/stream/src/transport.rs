//! Transport Seam
//!
//! `StreamTransport` abstracts how a session's event channel is opened and
//! how cancellation reaches the server. The orchestrator runs against this
//! trait, so tests substitute scripted in-memory transports with no network
//! involved.

use async_trait::async_trait;

use raggen_core::SessionId;

use crate::cancel::CancellationChannel;
use crate::channel::StreamChannel;
use crate::http::build_stream_client;
use crate::types::{StreamAck, StreamConfig, StreamResult};

/// How a feature orchestrator reaches the streaming service.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Opens the event channel for a session.
    async fn open(&self, session: &SessionId) -> StreamResult<StreamChannel>;

    /// Requests server-side cancellation for a session.
    async fn cancel(&self, session: &SessionId) -> StreamResult<StreamAck>;
}

/// Production transport: SSE over HTTP plus the DELETE cancellation call.
pub struct HttpStreamTransport {
    stream_client: reqwest::Client,
    canceller: CancellationChannel,
    config: StreamConfig,
}

impl HttpStreamTransport {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            stream_client: build_stream_client(),
            canceller: CancellationChannel::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

#[async_trait]
impl StreamTransport for HttpStreamTransport {
    async fn open(&self, session: &SessionId) -> StreamResult<StreamChannel> {
        StreamChannel::open(&self.stream_client, &self.config, session).await
    }

    async fn cancel(&self, session: &SessionId) -> StreamResult<StreamAck> {
        self.canceller.cancel(session).await
    }
}
