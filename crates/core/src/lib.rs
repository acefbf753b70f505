//! RagGen Core
//!
//! Event vocabulary, phase state machine, text accumulation, and data model
//! for the RagGen phased streaming protocol. This crate has no transport or
//! runtime dependencies; the `raggen-stream` crate supplies the SSE wire
//! layer and the root client crate supplies orchestration.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `session` - Session identity (`SessionId`)
//! - `streaming` - The closed stream event vocabulary (`StreamEvent`)
//! - `phase` - Phase state machine (`Phase`, `PhaseTracker`, `PhaseAction`)
//! - `sanitize` - Fragment normalization and accumulation
//! - `message` - Accumulated generation result and reference documents

pub mod error;
pub mod message;
pub mod phase;
pub mod sanitize;
pub mod session;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Session Identity ───────────────────────────────────────────────────
pub use session::SessionId;

// ── Event Vocabulary ───────────────────────────────────────────────────
pub use streaming::{PrepareProgress, StreamEvent};

// ── Phase State Machine ────────────────────────────────────────────────
pub use phase::{DataChannel, Phase, PhaseAction, PhaseTracker, Violation};

// ── Accumulation ───────────────────────────────────────────────────────
pub use sanitize::{accumulate, normalize};

// ── Data Model ─────────────────────────────────────────────────────────
pub use message::{AccumulatedMessage, Document};
