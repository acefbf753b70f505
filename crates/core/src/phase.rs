//! Phase State Machine
//!
//! Interprets the ordered event sequence of one generation session as
//! transitions through a bounded set of phases, and classifies every
//! inbound event as a transition, accepted data, or a tolerated protocol
//! anomaly. The tracker never fails hard on a malformed sequence: the
//! channel is the single source of truth and must keep delivering
//! subsequent legitimate events.

use serde::{Deserialize, Serialize};

use crate::streaming::StreamEvent;

/// The currently active stage of one generation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Connecting,
    Preparing,
    Inferencing,
    Answering,
    Referencing,
    Closed,
    Failed,
}

impl Phase {
    /// True for `Closed` and `Failed`; no further transitions are processed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Closed | Phase::Failed)
    }
}

/// Which accumulation buffer a data event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChannel {
    Prepare,
    Inference,
    Answer,
    Reference,
}

/// A tolerated protocol anomaly: an event that is invalid in the current
/// phase. Never fatal; surfaced so the orchestrator can log it, and the
/// payload (if any) must be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Phase that was active when the event arrived.
    pub phase: Phase,
    /// Wire name of the offending event.
    pub event: &'static str,
    /// Stray `*-done` flushes are expected during server-side cancellation
    /// and error unwinding, so they are reported at lower severity.
    pub benign: bool,
}

/// Outcome of feeding one event to the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseAction {
    /// Control event accepted; the session moved to a new phase.
    Moved { from: Phase, to: Phase },
    /// Data event valid for the active phase; apply its payload to the
    /// matching buffer.
    Accept(DataChannel),
    /// Event invalid in the current phase; payload dropped.
    Rejected(Violation),
    /// Event arrived after a terminal phase; nothing is processed.
    Discarded,
}

/// Tracks the phase of a single session across its event sequence.
#[derive(Debug)]
pub struct PhaseTracker {
    phase: Phase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feeds one inbound event and returns what the orchestrator should do
    /// with it.
    pub fn apply(&mut self, event: &StreamEvent) -> PhaseAction {
        use StreamEvent::*;

        if self.phase.is_terminal() {
            return PhaseAction::Discarded;
        }

        match (self.phase, event) {
            // Terminal events are valid from any non-terminal phase.
            (_, Disconnect) => self.move_to(Phase::Closed),
            (_, Exception) | (_, Error) => self.move_to(Phase::Failed),

            (Phase::Idle, Connect) => self.move_to(Phase::Connecting),

            (Phase::Connecting, PrepareStart) => self.move_to(Phase::Preparing),
            (Phase::Connecting, InferenceStart) => self.move_to(Phase::Inferencing),
            (Phase::Connecting, AnswerStart) => self.move_to(Phase::Answering),
            (Phase::Connecting, ReferenceStart) => self.move_to(Phase::Referencing),

            (Phase::Preparing, PrepareDone) => self.move_to(Phase::Connecting),
            (Phase::Inferencing, InferenceDone) => self.move_to(Phase::Connecting),
            (Phase::Answering, AnswerDone) => self.move_to(Phase::Connecting),
            (Phase::Referencing, ReferenceDone) => self.move_to(Phase::Connecting),

            (Phase::Preparing, Prepare { .. }) => PhaseAction::Accept(DataChannel::Prepare),
            (Phase::Inferencing, Inference { .. }) => PhaseAction::Accept(DataChannel::Inference),
            (Phase::Answering, Answer { .. }) => PhaseAction::Accept(DataChannel::Answer),
            (Phase::Referencing, Reference { .. }) => PhaseAction::Accept(DataChannel::Reference),

            // The server flushes `*-done` for phases that never started when
            // it unwinds a cancelled or failed generation.
            (_, PrepareDone | InferenceDone | AnswerDone | ReferenceDone) => {
                self.reject(event, true)
            }

            (_, _) => self.reject(event, false),
        }
    }

    /// Synthesizes a local failure (trigger rejection, transport error).
    /// No-op when already terminal.
    pub fn fail(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = Phase::Failed;
        }
    }

    /// Synthesizes a local close (user-initiated stop). No-op when already
    /// terminal.
    pub fn close(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = Phase::Closed;
        }
    }

    fn move_to(&mut self, to: Phase) -> PhaseAction {
        let from = self.phase;
        self.phase = to;
        PhaseAction::Moved { from, to }
    }

    fn reject(&self, event: &StreamEvent, benign: bool) -> PhaseAction {
        PhaseAction::Rejected(Violation {
            phase: self.phase,
            event: event.wire_name(),
            benign,
        })
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
