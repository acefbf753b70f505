//! RagGen Client
//!
//! Client-side orchestration for the RagGen phased streaming generation
//! protocol. Every feature (chat, report drafting, summarization,
//! translation, simulation) follows the same shape: open an event channel
//! keyed by a fresh session id, wait for the channel's `connect` signal,
//! fire the feature's trigger request, then accumulate phased events
//! (preparation, inference, answer, references) until a terminal event or
//! a user-initiated stop closes the channel.
//!
//! ## Module Organization
//!
//! - `orchestrator` - the generalized per-feature coordinator
//! - `features` - the `Trigger` trait and per-feature trigger requests
//! - `api` - REST client and the `{code, status, message, result}` envelope
//! - `error` - client error taxonomy
//!
//! The event vocabulary, phase state machine, and accumulation rules live
//! in `raggen-core`; the SSE wire layer lives in `raggen-stream`.

pub mod api;
pub mod error;
pub mod features;
pub mod orchestrator;

// Re-export main types
pub use api::{ApiClient, ApiResponse, Category, TranslateLanguage};
pub use error::{ClientError, ClientResult};
pub use features::{
    LlmChat, MyAiChat, RagChat, ReportFromFile, ReportFromText, SimulationChat, SummaryFromFile,
    SummaryFromText, TranslateFile, TranslateText, Trigger, TriggerReceipt,
};
pub use orchestrator::{FeatureOrchestrator, GenerationOutcome, GenerationUpdate, StopHandle};

// Re-export the protocol foundation for downstream callers
pub use raggen_core::{
    AccumulatedMessage, Document, Phase, PrepareProgress, SessionId, StreamEvent,
};
pub use raggen_stream::{HttpStreamTransport, StreamConfig, StreamTransport};
