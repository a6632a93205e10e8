//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

use crate::Credentials;

/// Endpoint used for both the streaming and the non-streaming call.
pub const DEFAULT_ENDPOINT: &str = "https://api.x.ai/v1/responses";

/// Model used when `XAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "grok-4-1-fast-reasoning";

/// LLM configuration interface.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn endpoint(&self) -> &str;
    fn model(&self) -> &str;

    fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key(), self.model())
    }
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub xai_api_key: String,
    pub xai_endpoint: String,
    pub xai_model: String,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.xai_api_key
    }
    fn endpoint(&self) -> &str {
        &self.xai_endpoint
    }
    fn model(&self) -> &str {
        &self.xai_model
    }
}

impl EnvLlmConfig {
    /// Load from environment variables: `XAI_API_KEY` (required), `XAI_BASE_URL`, `XAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let xai_api_key = env::var("XAI_API_KEY").context("XAI_API_KEY not set")?;
        let xai_endpoint = env::var("XAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let xai_model = env::var("XAI_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            xai_api_key,
            xai_endpoint,
            xai_model,
        })
    }
}
