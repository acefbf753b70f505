//! Client Error Types
//!
//! Application-level error taxonomy on top of the core and transport
//! errors. Trigger failures are kept distinct because they abort an
//! in-progress generation locally instead of waiting for a server-side
//! terminal event.

use thiserror::Error;

use raggen_stream::StreamError;

/// Errors surfaced by the RagGen client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-layer failure (stream open, request send).
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A request returned a non-success HTTP status.
    #[error("API request failed with HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A response body could not be interpreted.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Client misuse or internal invariant breakage.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for client errors
pub type ClientResult<T> = Result<T, ClientError>;
