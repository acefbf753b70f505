//! REST API Client
//!
//! Ordinary request/response calls around the stream: the feature trigger
//! endpoints and the auxiliary lookups, all wrapped in the service's
//! `{code, status, message, result}` envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use raggen_stream::{build_request_client, StreamConfig};

use crate::error::{ClientError, ClientResult};

/// Standard response envelope of every non-streaming endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

/// A chat knowledge category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: String,
    pub name: String,
}

/// A language available to the translation feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateLanguage {
    pub code: String,
    pub name: String,
}

/// HTTP client for the generation API.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: StreamConfig,
}

impl ApiClient {
    pub fn new(config: StreamConfig) -> Self {
        let client = build_request_client(config.request_timeout);
        Self { client, config }
    }

    /// Wraps an existing reqwest client (shared pools, tests).
    pub fn with_client(client: reqwest::Client, config: StreamConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// POSTs a JSON body and unwraps the response envelope.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        tracing::debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(raggen_stream::StreamError::from)?;

        Self::unwrap_envelope(path, response).await
    }

    /// GETs an endpoint and unwraps the response envelope.
    pub async fn get<T>(&self, path: &str) -> ClientResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(raggen_stream::StreamError::from)?;

        Self::unwrap_envelope(path, response).await
    }

    /// Lists the knowledge categories available to retrieval chat.
    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        let response: ApiResponse<Vec<Category>> = self.get("chat/category").await?;
        Ok(response.result.unwrap_or_default())
    }

    /// Lists the languages available to the translation feature.
    pub async fn translate_languages(&self) -> ClientResult<Vec<TranslateLanguage>> {
        let response: ApiResponse<Vec<TranslateLanguage>> =
            self.get("translate/language").await?;
        Ok(response.result.unwrap_or_default())
    }

    async fn unwrap_envelope<T>(
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("{path}: {e}")))
    }
}
