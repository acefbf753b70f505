//! Generation Data Model
//!
//! The externally visible, continuously-updated result of one generation
//! and the reference documents attached to it.

use serde::{Deserialize, Serialize};

/// A reference document backing a generated answer.
///
/// Produced by the trigger request's response body, attached once by the
/// orchestrator when the answer phase completes, never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub third_title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sub_content: String,
    #[serde(default)]
    pub origin_file_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub category_code: String,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub ext: String,
}

/// The accumulated result of one generation.
///
/// `content` and `inference` are append-only within a single generation and
/// frozen once a terminal phase is reached. `documents` is populated
/// atomically once, from the trigger response, not from the stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedMessage {
    pub content: String,
    pub inference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
}

impl AccumulatedMessage {
    pub fn new() -> Self {
        Self::default()
    }
}
