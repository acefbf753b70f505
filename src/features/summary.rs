//! Summary Triggers
//!
//! Summarization of pasted text or an already-uploaded file, with a target
//! length ratio relative to the source.

use async_trait::async_trait;
use serde::Serialize;

use raggen_core::SessionId;

use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;

use super::{DraftAck, Trigger, TriggerReceipt};

/// Summarizes pasted text.
#[derive(Debug, Clone)]
pub struct SummaryFromText {
    /// Target summary length as a fraction of the source.
    pub length_ratio: f64,
    pub context: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryTextRequest<'a> {
    session_id: &'a SessionId,
    length_ratio: f64,
    context: &'a str,
}

#[async_trait]
impl Trigger for SummaryFromText {
    fn feature(&self) -> &'static str {
        "summary/text"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response: ApiResponse<DraftAck> = api
            .post_json(
                "summary/text",
                &SummaryTextRequest {
                    session_id: session,
                    length_ratio: self.length_ratio,
                    context: &self.context,
                },
            )
            .await?;
        Ok(TriggerReceipt {
            message: response.message,
            documents: None,
        })
    }
}

/// Summarizes an already-uploaded file.
#[derive(Debug, Clone)]
pub struct SummaryFromFile {
    pub length_ratio: f64,
    pub file_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryFileRequest<'a> {
    session_id: &'a SessionId,
    length_ratio: f64,
    file_id: i64,
}

#[async_trait]
impl Trigger for SummaryFromFile {
    fn feature(&self) -> &'static str {
        "summary/file"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response: ApiResponse<DraftAck> = api
            .post_json(
                "summary/file",
                &SummaryFileRequest {
                    session_id: session,
                    length_ratio: self.length_ratio,
                    file_id: self.file_id,
                },
            )
            .await?;
        Ok(TriggerReceipt {
            message: response.message,
            documents: None,
        })
    }
}
