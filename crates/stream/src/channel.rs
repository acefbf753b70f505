//! Stream Channel
//!
//! Owns one unidirectional server-to-client event stream bound to a
//! session. Opening the channel is the only action that makes the server
//! start delivering events; the orchestrator must observe `connect` before
//! issuing the trigger request, otherwise early events can be lost to a
//! not-yet-subscribed client.

use std::collections::VecDeque;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use raggen_core::{SessionId, StreamEvent};

use crate::sse::{SseFrame, SseFrameParser};
use crate::types::{StreamConfig, StreamError, StreamResult};

/// A typed, ordered stream of generation events.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamResult<StreamEvent>> + Send>>;

/// One transport connection for one session.
///
/// The channel performs no retry on transport errors; that policy belongs
/// to the orchestrator. `close()` is idempotent and safe after EOF.
pub struct StreamChannel {
    session: SessionId,
    events: Option<EventStream>,
}

impl StreamChannel {
    /// Establishes the SSE transport to `{base}/stream/{sessionId}`.
    pub async fn open(
        client: &reqwest::Client,
        config: &StreamConfig,
        session: &SessionId,
    ) -> StreamResult<Self> {
        let url = config.endpoint(&format!("stream/{session}"))?;

        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Http { status, body });
        }

        tracing::info!("stream channel opened: session={}", session);

        let events = parse_byte_stream(session.clone(), response.bytes_stream());
        Ok(Self::from_stream(session.clone(), Box::pin(events)))
    }

    /// Wraps an already-typed event stream. Scripted transports in tests
    /// build channels through this.
    pub fn from_stream(session: SessionId, events: EventStream) -> Self {
        Self {
            session,
            events: Some(events),
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Next event in delivery order; `None` once the stream ended or the
    /// channel was closed.
    pub async fn next_event(&mut self) -> Option<StreamResult<StreamEvent>> {
        let stream = self.events.as_mut()?;
        let item = stream.next().await;
        if item.is_none() {
            self.close();
        }
        item
    }

    /// Tears the transport down. Idempotent.
    pub fn close(&mut self) {
        if self.events.take().is_some() {
            tracing::debug!("stream channel closed: session={}", self.session);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_none()
    }
}

/// Parses a raw byte stream (from a reqwest response) into typed events.
///
/// Buffers incoming chunks, splits on newlines, feeds the SSE frame parser,
/// and converts completed frames into `StreamEvent`s. Frames outside the
/// fixed vocabulary and data events with malformed payloads are logged and
/// skipped: the channel must keep delivering subsequent legitimate events.
fn parse_byte_stream<S>(
    session: SessionId,
    byte_stream: S,
) -> impl Stream<Item = StreamResult<StreamEvent>> + Send
where
    S: Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
{
    let state = SseStreamState {
        session,
        inner: Box::pin(byte_stream),
        buffer: String::new(),
        parser: SseFrameParser::new(),
        pending: VecDeque::new(),
        done: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        if let Some(event) = state.pending.pop_front() {
            return Some((event, state));
        }
        if state.done {
            return None;
        }

        loop {
            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.push_str(&String::from_utf8_lossy(&chunk));

                    while let Some(pos) = state.buffer.find('\n') {
                        let line = state.buffer[..pos].to_string();
                        state.buffer = state.buffer[pos + 1..].to_string();

                        if let Some(frame) = state.parser.push_line(&line) {
                            if let Some(event) = convert_frame(&state.session, frame) {
                                state.pending.push_back(Ok(event));
                            }
                        }
                    }

                    if let Some(event) = state.pending.pop_front() {
                        return Some((event, state));
                    }
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((
                        Err(StreamError::Network(format!("stream read error: {e}"))),
                        state,
                    ));
                }
                None => {
                    // EOF: flush a partial trailing line and any frame the
                    // server left undispatched.
                    state.done = true;
                    if !state.buffer.is_empty() {
                        let remaining = std::mem::take(&mut state.buffer);
                        state.parser.push_line(&remaining);
                    }
                    if let Some(frame) = state.parser.flush() {
                        if let Some(event) = convert_frame(&state.session, frame) {
                            return Some((Ok(event), state));
                        }
                    }
                    return None;
                }
            }
        }
    })
}

fn convert_frame(session: &SessionId, frame: SseFrame) -> Option<StreamEvent> {
    match StreamEvent::from_wire(&frame.event, &frame.data) {
        Ok(event) => {
            tracing::trace!("stream event: session={} event={}", session, event.wire_name());
            Some(event)
        }
        Err(e) => {
            // Tolerated anomaly: drop the frame, keep the channel alive.
            tracing::warn!("dropping stream frame: session={} error={}", session, e);
            None
        }
    }
}

struct SseStreamState {
    session: SessionId,
    inner: Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>,
    buffer: String,
    parser: SseFrameParser,
    pending: VecDeque<StreamResult<StreamEvent>>,
    done: bool,
}
