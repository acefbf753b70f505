//! Feature Triggers
//!
//! Each generation feature fires exactly one POST request, correlated by
//! session id, once the stream channel signals readiness. A `Trigger`
//! bundles the feature-specific parameters and knows how to fire that
//! request; the orchestrator stays identical across features.

use async_trait::async_trait;
use serde::Deserialize;

use raggen_core::{Document, SessionId};

use crate::api::ApiClient;
use crate::error::ClientResult;

pub mod chat;
pub mod report;
pub mod summary;
pub mod translate;

pub use chat::{LlmChat, MyAiChat, RagChat, SimulationChat};
pub use report::{ReportFromFile, ReportFromText};
pub use summary::{SummaryFromFile, SummaryFromText};
pub use translate::{TranslateFile, TranslateText};

/// What the orchestrator keeps from a resolved trigger call.
#[derive(Debug, Clone, Default)]
pub struct TriggerReceipt {
    /// Envelope message, surfaced in logs.
    pub message: String,
    /// Reference documents to attach when the answer phase completes.
    pub documents: Option<Vec<Document>>,
}

/// A feature-specific generation trigger.
#[async_trait]
pub trait Trigger: Send + Sync {
    /// Endpoint label used in logs (e.g. `chat/ai`).
    fn feature(&self) -> &'static str;

    /// Fires the trigger request for the given session.
    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt>;
}

/// Acknowledgement body shared by the report/summary/translate triggers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAck {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub msg_id: String,
    #[serde(default)]
    pub content: String,
}
