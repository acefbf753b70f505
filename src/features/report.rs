//! Report Triggers
//!
//! Report drafting from pasted reference text or from a previously
//! uploaded file (the upload itself happens outside this crate; the
//! trigger only references it).

use async_trait::async_trait;
use serde::Serialize;

use raggen_core::SessionId;

use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;

use super::{DraftAck, Trigger, TriggerReceipt};

/// Drafts a report from pasted reference text.
#[derive(Debug, Clone)]
pub struct ReportFromText {
    pub prompt: String,
    pub title: String,
    pub context: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportTextRequest<'a> {
    session_id: &'a SessionId,
    prompt: &'a str,
    title: &'a str,
    context: &'a str,
}

#[async_trait]
impl Trigger for ReportFromText {
    fn feature(&self) -> &'static str {
        "report/text"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response: ApiResponse<DraftAck> = api
            .post_json(
                "report/text",
                &ReportTextRequest {
                    session_id: session,
                    prompt: &self.prompt,
                    title: &self.title,
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

/// Drafts a report from an already-uploaded reference file.
#[derive(Debug, Clone)]
pub struct ReportFromFile {
    pub prompt: String,
    pub title: String,
    pub file_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportFileRequest<'a> {
    session_id: &'a SessionId,
    prompt: &'a str,
    title: &'a str,
    file_id: i64,
}

#[async_trait]
impl Trigger for ReportFromFile {
    fn feature(&self) -> &'static str {
        "report/file"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response: ApiResponse<DraftAck> = api
            .post_json(
                "report/file",
                &ReportFileRequest {
                    session_id: session,
                    prompt: &self.prompt,
                    title: &self.title,
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
