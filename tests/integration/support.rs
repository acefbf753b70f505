//! Shared Test Doubles
//!
//! Scripted transports and recording triggers so orchestrator tests can
//! drive exact event sequences without a server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use raggen_client::api::ApiClient;
use raggen_client::error::{ClientError, ClientResult};
use raggen_client::features::{Trigger, TriggerReceipt};
use raggen_client::{SessionId, StreamConfig, StreamEvent, StreamTransport};
use raggen_stream::{EventStream, StreamAck, StreamChannel, StreamError, StreamResult};

/// Transport that hands out one pre-scripted event stream and counts
/// open/cancel calls.
pub struct ScriptedTransport {
    stream: Mutex<Option<EventStream>>,
    opens: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(stream: EventStream) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
            opens: Arc::new(AtomicUsize::new(0)),
            cancels: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scripts a fixed event sequence; the stream ends (EOF) after the
    /// last event.
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        Self::new(Box::pin(futures_util::stream::iter(
            events.into_iter().map(Ok::<_, StreamError>),
        )))
    }

    /// Counters stay readable after the transport moves into the
    /// orchestrator.
    pub fn counters(&self) -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        (Arc::clone(&self.opens), Arc::clone(&self.cancels))
    }
}

#[async_trait]
impl StreamTransport for ScriptedTransport {
    async fn open(&self, session: &SessionId) -> StreamResult<StreamChannel> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let stream = self
            .stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| StreamError::Network("scripted stream already consumed".to_string()))?;
        Ok(StreamChannel::from_stream(session.clone(), stream))
    }

    async fn cancel(&self, _session: &SessionId) -> StreamResult<StreamAck> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(StreamAck {
            code: 200,
            status: "OK".to_string(),
            message: "stream removed".to_string(),
        })
    }
}

/// A transport fed manually through a channel, for stall and stop tests.
/// Dropping the sender ends the stream (EOF).
pub fn channel_transport() -> (ScriptedTransport, mpsc::Sender<StreamResult<StreamEvent>>) {
    let (tx, rx) = mpsc::channel(32);
    let transport = ScriptedTransport::new(Box::pin(ReceiverStream::new(rx)));
    (transport, tx)
}

/// Trigger that records how often it fired and resolves with a canned
/// receipt.
pub struct RecordingTrigger {
    fired: Arc<AtomicUsize>,
    receipt: TriggerReceipt,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::with_receipt(TriggerReceipt {
            message: "answer requested".to_string(),
            documents: None,
        })
    }

    pub fn with_receipt(receipt: TriggerReceipt) -> Self {
        Self {
            fired: Arc::new(AtomicUsize::new(0)),
            receipt,
        }
    }

    pub fn fire_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fired)
    }
}

#[async_trait]
impl Trigger for RecordingTrigger {
    fn feature(&self) -> &'static str {
        "test/recording"
    }

    async fn fire(&self, _api: &ApiClient, _session: &SessionId) -> ClientResult<TriggerReceipt> {
        self.fired.fetch_add(1, Ordering::SeqCst);
        Ok(self.receipt.clone())
    }
}

/// Trigger that always rejects, as if the POST returned a server error.
pub struct FailingTrigger;

#[async_trait]
impl Trigger for FailingTrigger {
    fn feature(&self) -> &'static str {
        "test/failing"
    }

    async fn fire(&self, _api: &ApiClient, _session: &SessionId) -> ClientResult<TriggerReceipt> {
        Err(ClientError::Http {
            status: 500,
            message: "generation backend unavailable".to_string(),
        })
    }
}

/// An `ApiClient` that never gets used by the test triggers.
pub fn unused_api() -> ApiClient {
    ApiClient::new(StreamConfig::default())
}

/// Drains every update currently buffered on the receiver.
pub fn drain_updates(
    rx: &mut mpsc::Receiver<raggen_client::GenerationUpdate>,
) -> Vec<raggen_client::GenerationUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}
