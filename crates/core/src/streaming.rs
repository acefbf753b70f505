//! Stream Event Vocabulary
//!
//! The closed set of named events a generation channel can deliver, and the
//! conversion from raw wire frames (event name + data payload) into typed
//! values. Keeping the vocabulary a single enum means a new or renamed
//! event is a compile error at every match site instead of a silently
//! ignored string key.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Progress tick payload of a `prepare` data event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareProgress {
    /// Fraction of preparation completed, in `0.0..=1.0`.
    pub progress: f64,
    /// Optional human-readable progress message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A single named event delivered on the generation channel.
///
/// Control events (`*-start`, `*-done`, `connect`, terminals) carry no
/// payload; the server echoes the event name as data, which is discarded.
/// Data events carry their typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Channel ready; safe to issue the trigger request.
    Connect,

    /// Bounds of the optional preparation phase.
    PrepareStart,
    /// Preparation progress tick.
    Prepare { progress: PrepareProgress },
    PrepareDone,

    /// Bounds of the optional reasoning phase.
    InferenceStart,
    /// Reasoning text chunk.
    Inference { content: String },
    InferenceDone,

    /// Bounds of the mandatory answer phase.
    AnswerStart,
    /// Answer text chunk.
    Answer { content: String },
    AnswerDone,

    /// Bounds of the optional reference-listing phase.
    ReferenceStart,
    /// Reference/citation chunk.
    Reference { content: String },
    ReferenceDone,

    /// Graceful, successful termination.
    Disconnect,
    /// Server-side abnormal termination.
    Exception,
    /// Transport-level error.
    Error,
}

impl StreamEvent {
    /// Builds a typed event from a wire frame.
    ///
    /// Control events ignore `data`. The `prepare` payload is parsed as a
    /// JSON progress object; text data events take the payload verbatim
    /// (sanitization happens at accumulation time, not here).
    pub fn from_wire(name: &str, data: &str) -> CoreResult<Self> {
        let event = match name {
            "connect" => Self::Connect,
            "prepare-start" => Self::PrepareStart,
            "prepare" => Self::Prepare {
                progress: serde_json::from_str(data)
                    .map_err(|e| CoreError::invalid_payload("prepare", e.to_string()))?,
            },
            "prepare-done" => Self::PrepareDone,
            "inference-start" => Self::InferenceStart,
            "inference" => Self::Inference {
                content: data.to_string(),
            },
            "inference-done" => Self::InferenceDone,
            "answer-start" => Self::AnswerStart,
            "answer" => Self::Answer {
                content: data.to_string(),
            },
            "answer-done" => Self::AnswerDone,
            "reference-start" => Self::ReferenceStart,
            "reference" => Self::Reference {
                content: data.to_string(),
            },
            "reference-done" => Self::ReferenceDone,
            "disconnect" => Self::Disconnect,
            "exception" => Self::Exception,
            "error" => Self::Error,
            other => return Err(CoreError::UnknownEvent(other.to_string())),
        };

        Ok(event)
    }

    /// The event's name as it appears on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::PrepareStart => "prepare-start",
            Self::Prepare { .. } => "prepare",
            Self::PrepareDone => "prepare-done",
            Self::InferenceStart => "inference-start",
            Self::Inference { .. } => "inference",
            Self::InferenceDone => "inference-done",
            Self::AnswerStart => "answer-start",
            Self::Answer { .. } => "answer",
            Self::AnswerDone => "answer-done",
            Self::ReferenceStart => "reference-start",
            Self::Reference { .. } => "reference",
            Self::ReferenceDone => "reference-done",
            Self::Disconnect => "disconnect",
            Self::Exception => "exception",
            Self::Error => "error",
        }
    }

    /// True for `disconnect`, `exception`, and `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnect | Self::Exception | Self::Error)
    }

    /// True for payload-carrying events.
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Self::Prepare { .. } | Self::Inference { .. } | Self::Answer { .. } | Self::Reference { .. }
        )
    }
}
