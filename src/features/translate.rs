//! Translate Triggers
//!
//! Translation of pasted text or an already-uploaded document between a
//! source and a target language, optionally applying the user dictionary.

use async_trait::async_trait;
use serde::Serialize;

use raggen_core::SessionId;

use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;

use super::{DraftAck, Trigger, TriggerReceipt};

/// Translates pasted text.
#[derive(Debug, Clone)]
pub struct TranslateText {
    pub before_lang: String,
    pub after_lang: String,
    pub contain_dic: bool,
    pub context: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateTextRequest<'a> {
    session_id: &'a SessionId,
    before_lang: &'a str,
    after_lang: &'a str,
    contain_dic: bool,
    context: &'a str,
}

#[async_trait]
impl Trigger for TranslateText {
    fn feature(&self) -> &'static str {
        "translate/text"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response: ApiResponse<DraftAck> = api
            .post_json(
                "translate/text",
                &TranslateTextRequest {
                    session_id: session,
                    before_lang: &self.before_lang,
                    after_lang: &self.after_lang,
                    contain_dic: self.contain_dic,
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

/// Translates an already-uploaded document.
#[derive(Debug, Clone)]
pub struct TranslateFile {
    pub before_lang: String,
    pub after_lang: String,
    pub contain_dic: bool,
    pub file_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateFileRequest<'a> {
    session_id: &'a SessionId,
    before_lang: &'a str,
    after_lang: &'a str,
    contain_dic: bool,
    file_id: i64,
}

#[async_trait]
impl Trigger for TranslateFile {
    fn feature(&self) -> &'static str {
        "translate/file"
    }

    async fn fire(&self, api: &ApiClient, session: &SessionId) -> ClientResult<TriggerReceipt> {
        let response: ApiResponse<DraftAck> = api
            .post_json(
                "translate/file",
                &TranslateFileRequest {
                    session_id: session,
                    before_lang: &self.before_lang,
                    after_lang: &self.after_lang,
                    contain_dic: self.contain_dic,
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
