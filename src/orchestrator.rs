//! Feature Orchestrator
//!
//! One generalized coordinator for every streaming feature. It owns the
//! session, the event channel, the phase tracker, and the accumulation
//! state; fires the feature trigger once the channel signals readiness;
//! and exposes an independent stop path that can never leave the caller
//! stuck in a streaming state.
//!
//! The trigger request is issued strictly after the `connect` event has
//! been observed. Issuing it earlier risks the server emitting events into
//! a channel the client is not yet subscribed to.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use raggen_core::{
    accumulate, AccumulatedMessage, DataChannel, Phase, PhaseAction, PhaseTracker, SessionId,
    StreamEvent,
};
use raggen_stream::StreamTransport;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::features::{Trigger, TriggerReceipt};

/// User-facing message for a rejected trigger request.
const MSG_TRIGGER_FAILED: &str = "Failed to generate an answer. Please try again.";
/// User-facing message for transport-level failures.
const MSG_COMMUNICATION: &str =
    "Communication with the server is unstable. Please try again later.";

/// Continuously-updated view of one generation, pushed to the UI
/// collaborator. Text updates carry the full re-normalized buffer, not the
/// delta; the collaborator re-renders the whole accumulated text.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationUpdate {
    Phase { phase: Phase },
    Progress {
        progress: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Inference { inference: String },
    Content { content: String },
    References { references: String },
    Documents { documents: Vec<raggen_core::Document> },
    Failed { message: String },
}

/// Final, frozen result of one generation attempt.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub session: SessionId,
    pub phase: Phase,
    pub message: AccumulatedMessage,
    /// Accumulated reference/citation text.
    pub references: String,
    /// Last observed preparation progress, `0.0..=1.0`.
    pub progress: f64,
    /// True when the attempt ended through `stop()` rather than a terminal
    /// event.
    pub stopped: bool,
    /// User-facing error when the attempt failed.
    pub error: Option<String>,
}

/// Handle for one generation attempt: carries the session identity and the
/// out-of-band stop path. Cloneable so the UI can keep it next to a stop
/// button while the generation future runs elsewhere.
pub struct StopHandle<T: StreamTransport> {
    session: SessionId,
    token: CancellationToken,
    transport: Arc<T>,
    used: Arc<AtomicBool>,
}

impl<T: StreamTransport> Clone for StopHandle<T> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            token: self.token.clone(),
            transport: Arc::clone(&self.transport),
            used: Arc::clone(&self.used),
        }
    }
}

impl<T: StreamTransport> StopHandle<T> {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Stops the attempt. Local release happens first — the orchestrator
    /// goes idle within one tick — and the server-side cancellation request
    /// is best effort: its failure or a race with an in-flight terminal
    /// event changes nothing for the caller. Safe to call at any phase,
    /// repeatedly, and after the channel already closed.
    pub async fn stop(&self) {
        self.token.cancel();

        match self.transport.cancel(&self.session).await {
            Ok(ack) => tracing::info!(
                "generation stopped: session={} ack={}",
                self.session,
                ack.message
            ),
            Err(e) => tracing::warn!(
                "stop request not acknowledged (ignored): session={} error={}",
                self.session,
                e
            ),
        }
    }
}

/// Per-feature coordinator, generalized over the trigger and the transport.
pub struct FeatureOrchestrator<T: StreamTransport> {
    transport: Arc<T>,
    api: ApiClient,
}

impl<T: StreamTransport> FeatureOrchestrator<T> {
    pub fn new(transport: T, api: ApiClient) -> Self {
        Self {
            transport: Arc::new(transport),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Allocates the session identity for one generation attempt.
    ///
    /// The returned handle both starts the attempt (via [`generate`]) and
    /// stops it. A handle is valid for exactly one attempt; retries begin a
    /// new one.
    ///
    /// [`generate`]: FeatureOrchestrator::generate
    pub fn begin(&self) -> StopHandle<T> {
        StopHandle {
            session: SessionId::generate(),
            token: CancellationToken::new(),
            transport: Arc::clone(&self.transport),
            used: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs one generation attempt to its frozen outcome.
    ///
    /// Opens the channel, waits for `connect`, fires the trigger, routes
    /// every event through the phase tracker and the accumulator, and
    /// finalizes exactly once — on a terminal event, a trigger rejection, a
    /// transport failure, or `stop()`.
    pub async fn generate(
        &self,
        attempt: &StopHandle<T>,
        trigger: &dyn Trigger,
        updates: mpsc::Sender<GenerationUpdate>,
    ) -> ClientResult<GenerationOutcome> {
        if attempt.used.swap(true, Ordering::SeqCst) {
            return Err(ClientError::Internal(format!(
                "session {} was already used for a generation attempt",
                attempt.session
            )));
        }

        let session = attempt.session.clone();
        let mut tracker = PhaseTracker::new();
        let mut state = GenerationState::default();

        // Stopped before anything happened: no channel, no trigger.
        if attempt.token.is_cancelled() {
            return Ok(Self::outcome(&session, &tracker, state, true, None));
        }

        tracing::info!("generation starting: feature={} session={}", trigger.feature(), session);

        let mut channel = match self.transport.open(&session).await {
            Ok(channel) => channel,
            Err(e) => {
                tracing::error!("stream open failed: session={} error={}", session, e);
                tracker.fail();
                Self::emit_local_failure(&updates, MSG_COMMUNICATION).await;
                return Ok(Self::outcome(
                    &session,
                    &tracker,
                    state,
                    false,
                    Some(MSG_COMMUNICATION.to_string()),
                ));
            }
        };

        let mut trigger_task: Option<TriggerFuture<'_>> = None;
        let mut receipt: Option<TriggerReceipt> = None;
        let mut stopped = false;
        let mut error: Option<String> = None;

        loop {
            tokio::select! {
                biased;

                _ = attempt.token.cancelled() => {
                    tracker.close();
                    stopped = true;
                    let _ = updates.send(GenerationUpdate::Phase { phase: tracker.phase() }).await;
                    break;
                }

                result = resolve_trigger(&mut trigger_task) => {
                    match result {
                        Ok(resolved) => {
                            tracing::info!(
                                "trigger acknowledged: feature={} session={} message={}",
                                trigger.feature(),
                                session,
                                resolved.message
                            );
                            receipt = Some(resolved);
                            try_attach_documents(&mut state, receipt.as_ref(), &updates).await;
                        }
                        Err(e) => {
                            // No terminal event will ever arrive for a
                            // generation the server never started.
                            tracing::error!(
                                "trigger request failed: feature={} session={} error={}",
                                trigger.feature(),
                                session,
                                e
                            );
                            tracker.fail();
                            Self::emit_local_failure(&updates, MSG_TRIGGER_FAILED).await;
                            error = Some(MSG_TRIGGER_FAILED.to_string());
                            break;
                        }
                    }
                }

                event = channel.next_event() => {
                    match event {
                        Some(Ok(event)) => {
                            match tracker.apply(&event) {
                                PhaseAction::Moved { from, to } => {
                                    tracing::debug!(
                                        "phase transition: session={} {from:?} -> {to:?}",
                                        session
                                    );
                                    let _ = updates.send(GenerationUpdate::Phase { phase: to }).await;

                                    if event == StreamEvent::Connect {
                                        tracing::debug!(
                                            "channel ready, firing trigger: session={}",
                                            session
                                        );
                                        trigger_task = Some(trigger.fire(&self.api, &session));
                                    }

                                    if event == StreamEvent::AnswerDone {
                                        state.answer_done = true;
                                        try_attach_documents(&mut state, receipt.as_ref(), &updates)
                                            .await;
                                    }

                                    if to.is_terminal() {
                                        if to == Phase::Failed {
                                            let _ = updates
                                                .send(GenerationUpdate::Failed {
                                                    message: MSG_COMMUNICATION.to_string(),
                                                })
                                                .await;
                                            error = Some(MSG_COMMUNICATION.to_string());
                                        }
                                        break;
                                    }
                                }
                                PhaseAction::Accept(data) => {
                                    state.apply(data, &event, &updates).await;
                                }
                                PhaseAction::Rejected(violation) => {
                                    if violation.benign {
                                        tracing::debug!(
                                            "ignoring flush event: session={} event={} phase={:?}",
                                            session,
                                            violation.event,
                                            violation.phase
                                        );
                                    } else {
                                        tracing::warn!(
                                            "protocol violation (payload dropped): session={} event={} phase={:?}",
                                            session,
                                            violation.event,
                                            violation.phase
                                        );
                                    }
                                }
                                PhaseAction::Discarded => {
                                    tracing::debug!(
                                        "event after terminal phase discarded: session={} event={}",
                                        session,
                                        event.wire_name()
                                    );
                                }
                            }
                        }
                        Some(Err(e)) => {
                            tracing::error!("stream transport error: session={} error={}", session, e);
                            tracker.fail();
                            Self::emit_local_failure(&updates, MSG_COMMUNICATION).await;
                            error = Some(MSG_COMMUNICATION.to_string());
                            break;
                        }
                        None => {
                            // EOF without a terminal event counts as a
                            // transport failure; no automatic reconnect.
                            if !tracker.phase().is_terminal() {
                                tracing::error!(
                                    "stream ended without terminal event: session={}",
                                    session
                                );
                                tracker.fail();
                                Self::emit_local_failure(&updates, MSG_COMMUNICATION).await;
                                error = Some(MSG_COMMUNICATION.to_string());
                            }
                            break;
                        }
                    }
                }
            }
        }

        channel.close();

        tracing::info!(
            "generation finished: session={} phase={:?} stopped={} content_len={}",
            session,
            tracker.phase(),
            stopped,
            state.message.content.len()
        );

        Ok(Self::outcome(&session, &tracker, state, stopped, error))
    }

    /// Pushes the `Failed` phase followed by the user-facing message, for
    /// failures synthesized locally (the server never emitted a terminal
    /// event, so no phase update went out for them).
    async fn emit_local_failure(updates: &mpsc::Sender<GenerationUpdate>, message: &str) {
        let _ = updates
            .send(GenerationUpdate::Phase { phase: Phase::Failed })
            .await;
        let _ = updates
            .send(GenerationUpdate::Failed {
                message: message.to_string(),
            })
            .await;
    }

    fn outcome(
        session: &SessionId,
        tracker: &PhaseTracker,
        state: GenerationState,
        stopped: bool,
        error: Option<String>,
    ) -> GenerationOutcome {
        GenerationOutcome {
            session: session.clone(),
            phase: tracker.phase(),
            message: state.message,
            references: state.references,
            progress: state.progress,
            stopped,
            error,
        }
    }
}

type TriggerFuture<'a> = Pin<Box<dyn Future<Output = ClientResult<TriggerReceipt>> + Send + 'a>>;

/// Awaits the in-flight trigger request, clearing the slot on completion.
/// Pends forever when no trigger is in flight.
async fn resolve_trigger<'a>(
    slot: &mut Option<TriggerFuture<'a>>,
) -> ClientResult<TriggerReceipt> {
    match slot.as_mut() {
        Some(task) => {
            let result = task.as_mut().await;
            *slot = None;
            result
        }
        None => std::future::pending().await,
    }
}

/// Session-scoped accumulation state, owned by the generation loop.
#[derive(Default)]
struct GenerationState {
    message: AccumulatedMessage,
    references: String,
    progress: f64,
    answer_done: bool,
    documents_attached: bool,
}

impl GenerationState {
    /// Applies an accepted data event's payload to the matching buffer and
    /// pushes the refreshed snapshot.
    async fn apply(
        &mut self,
        data: DataChannel,
        event: &StreamEvent,
        updates: &mpsc::Sender<GenerationUpdate>,
    ) {
        match (data, event) {
            (DataChannel::Prepare, StreamEvent::Prepare { progress }) => {
                self.progress = progress.progress;
                let _ = updates
                    .send(GenerationUpdate::Progress {
                        progress: progress.progress,
                        message: progress.message.clone(),
                    })
                    .await;
            }
            (DataChannel::Inference, StreamEvent::Inference { content }) => {
                self.message.inference = accumulate(&self.message.inference, content);
                let _ = updates
                    .send(GenerationUpdate::Inference {
                        inference: self.message.inference.clone(),
                    })
                    .await;
            }
            (DataChannel::Answer, StreamEvent::Answer { content }) => {
                self.message.content = accumulate(&self.message.content, content);
                let _ = updates
                    .send(GenerationUpdate::Content {
                        content: self.message.content.clone(),
                    })
                    .await;
            }
            (DataChannel::Reference, StreamEvent::Reference { content }) => {
                self.references = accumulate(&self.references, content);
                let _ = updates
                    .send(GenerationUpdate::References {
                        references: self.references.clone(),
                    })
                    .await;
            }
            // The tracker only accepts a data channel for its own event.
            _ => {}
        }
    }
}

/// Attaches the trigger receipt's documents once the answer phase has
/// completed. Exactly-once regardless of whether the trigger or the
/// `answer-done` event resolves first.
async fn try_attach_documents(
    state: &mut GenerationState,
    receipt: Option<&TriggerReceipt>,
    updates: &mpsc::Sender<GenerationUpdate>,
) {
    if state.documents_attached || !state.answer_done {
        return;
    }
    let Some(documents) = receipt.and_then(|r| r.documents.clone()) else {
        return;
    };

    state.documents_attached = true;
    state.message.documents = Some(documents.clone());
    let _ = updates.send(GenerationUpdate::Documents { documents }).await;
}
