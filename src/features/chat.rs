//! Chat Triggers
//!
//! Four chat-style features share the same streamed answer protocol and
//! differ only in their trigger endpoint and parameters: retrieval chat,
//! plain LLM chat, project-scoped "my AI" chat, and parameterized
//! simulation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use raggen_core::{Document, SessionId};

use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;

use super::{Trigger, TriggerReceipt};

/// Acknowledgement body of the chat trigger endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAck {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub session_id: String,
    /// Only the project-scoped endpoint returns reference documents.
    #[serde(default)]
    pub documents: Option<Vec<Document>>,
}

fn receipt_from(response: ApiResponse<ChatAck>) -> TriggerReceipt {
    TriggerReceipt {
        message: response.message,
        documents: response.result.and_then(|ack| ack.documents),
    }
}

/// Retrieval-augmented chat over the selected knowledge categories.
#[derive(Debug, Clone)]
pub struct RagChat {
    pub query: String,
    /// Empty means all categories.
    pub category_codes: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RagChatRequest<'a> {
    query: &'a str,
    session_id: &'a SessionId,
    category_codes: &'a [String],
}

#[async_trait]
impl Trigger for RagChat {
    fn feature(&self) -> &'static str {
        "chat/ai"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response = api
            .post_json(
                "chat/ai",
                &RagChatRequest {
                    query: &self.query,
                    session_id: session,
                    category_codes: &self.category_codes,
                },
            )
            .await?;
        Ok(receipt_from(response))
    }
}

/// Plain LLM chat without retrieval.
#[derive(Debug, Clone)]
pub struct LlmChat {
    pub query: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LlmChatRequest<'a> {
    query: &'a str,
    session_id: &'a SessionId,
}

#[async_trait]
impl Trigger for LlmChat {
    fn feature(&self) -> &'static str {
        "chat/llm"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response = api
            .post_json(
                "chat/llm",
                &LlmChatRequest {
                    query: &self.query,
                    session_id: session,
                },
            )
            .await?;
        Ok(receipt_from(response))
    }
}

/// Chat scoped to one user-built project; the response carries the
/// reference documents attached once the answer completes.
#[derive(Debug, Clone)]
pub struct MyAiChat {
    pub query: String,
    pub project_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MyAiChatRequest<'a> {
    query: &'a str,
    session_id: &'a SessionId,
    project_id: i64,
}

#[async_trait]
impl Trigger for MyAiChat {
    fn feature(&self) -> &'static str {
        "chat/myai"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response = api
            .post_json(
                "chat/myai",
                &MyAiChatRequest {
                    query: &self.query,
                    session_id: session,
                    project_id: self.project_id,
                },
            )
            .await?;
        Ok(receipt_from(response))
    }
}

/// Free-form model simulation with explicit sampling parameters.
#[derive(Debug, Clone)]
pub struct SimulationChat {
    pub query: String,
    pub context: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationRequest<'a> {
    query: &'a str,
    session_id: &'a SessionId,
    context: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[async_trait]
impl Trigger for SimulationChat {
    fn feature(&self) -> &'static str {
        "chat/simulation"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response = api
            .post_json(
                "chat/simulation",
                &SimulationRequest {
                    query: &self.query,
                    session_id: session,
                    context: &self.context,
                    prompt: &self.prompt,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    top_p: self.top_p,
                },
            )
            .await?;
        Ok(receipt_from(response))
    }
}
