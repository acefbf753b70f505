//! Core Error Types
//!
//! Foundational error types for the RagGen workspace. These are
//! dependency-free (only thiserror + std) so every other crate can consume
//! them without pulling in transport or runtime dependencies.

use thiserror::Error;

/// Core error type for protocol-level failures.
///
/// Transport and application crates extend this with their own variants
/// (network, HTTP status, trigger failures).
#[derive(Error, Debug)]
pub enum CoreError {
    /// An event name outside the fixed vocabulary arrived on the wire.
    #[error("Unknown stream event: {0}")]
    UnknownEvent(String),

    /// A data event carried a payload that could not be interpreted.
    #[error("Invalid event payload for '{event}': {message}")]
    InvalidPayload { event: String, message: String },

    /// JSON serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid-payload error
    pub fn invalid_payload(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            event: event.into(),
            message: message.into(),
        }
    }
}
