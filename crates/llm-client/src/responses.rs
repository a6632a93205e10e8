//! HTTP client for the Responses-style endpoint.
//!
//! ## External Interactions
//!
//! - **Model API**: `POST {endpoint}` with bearer auth and body
//!   `{"input": [...messages], "model": "...", "stream": bool}`.

use async_trait::async_trait;
use futures::StreamExt;
use prompt::ChatMessage;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::{LlmConfig, DEFAULT_ENDPOINT};
use crate::envelope::{extract_text, COMPLETION_EXTRACTORS};
use crate::sse::sse_fragments;
use crate::{mask_token, Credentials, LlmClient, LlmError, TextStream};

#[derive(Serialize)]
struct RequestBody<'a> {
    input: &'a [ChatMessage],
    model: &'a str,
    stream: bool,
}

/// [`LlmClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ResponsesClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for ResponsesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponsesClient {
    /// Client for the default endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client for a custom endpoint (proxies, compatible servers, tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_endpoint(config.endpoint())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        credentials: &Credentials,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, LlmError> {
        if credentials.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        if messages.is_empty() {
            return Err(LlmError::NoMessages);
        }

        info!(
            model = %credentials.model,
            message_count = messages.len(),
            api_key = %mask_token(&credentials.api_key),
            stream = stream,
            "Model API request"
        );

        let body = RequestBody {
            input: messages,
            model: &credentials.model,
            stream,
        };
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&credentials.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            return Err(LlmError::from_status(status.as_u16(), reason));
        }
        Ok(response)
    }
}

#[async_trait]
impl LlmClient for ResponsesClient {
    #[instrument(skip(self, credentials, messages), fields(model = %credentials.model))]
    async fn complete(
        &self,
        credentials: &Credentials,
        messages: Vec<ChatMessage>,
    ) -> Result<String, LlmError> {
        let response = self.send(credentials, &messages, false).await?;
        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| LlmError::Malformed(e.to_string()))?;

        let text = extract_text(&value, COMPLETION_EXTRACTORS).ok_or(LlmError::EmptyResponse)?;
        debug!(response_len = text.len(), "Model API completion received");
        Ok(text)
    }

    #[instrument(skip(self, credentials, messages), fields(model = %credentials.model))]
    async fn stream(
        &self,
        credentials: &Credentials,
        messages: Vec<ChatMessage>,
    ) -> Result<TextStream, LlmError> {
        let response = self.send(credentials, &messages, true).await?;
        debug!("Model API stream opened");
        Ok(sse_fragments(Box::pin(response.bytes_stream())).boxed())
    }
}
