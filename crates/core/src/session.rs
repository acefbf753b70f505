//! Session Identity
//!
//! A session id scopes exactly one generation attempt: the event channel,
//! the trigger request, and the cancellation request are all correlated by
//! it. Ids are generated client-side before the channel opens and are never
//! reused; a retry is a new session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, client-generated identifier for one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh process-unique session id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier (tests, replay tooling).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
