//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an HTTP implementation for a Responses-style
//! endpoint ([`ResponsesClient`]). Two call shapes are supported:
//!
//! - **complete**: one non-streaming request, text extracted from the response envelope
//! - **stream**: a [`TextStream`] of text fragments, terminated by the `[DONE]` sentinel
//!
//! Streams are plain `futures` streams: dropping one cancels the request.
//! [`drive_stream`] consumes a stream while notifying a [`StreamObserver`].
//!
//! Response envelopes vary between API versions; see [`envelope`] for the
//! ordered extractor strategies.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use prompt::ChatMessage;
use std::fmt;

mod config;
pub mod envelope;
mod error;
mod mask;
mod responses;
mod sse;

pub use config::{EnvLlmConfig, LlmConfig, DEFAULT_ENDPOINT};
pub use error::{format_error_message, LlmError};
pub use mask::mask_token;
pub use responses::ResponsesClient;
pub use sse::parse_sse_data;

/// Incremental text fragments of a streamed completion.
pub type TextStream = BoxStream<'static, Result<String, LlmError>>;

/// Bearer credential and model id for one call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub model: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask_token(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

/// Model API interface: completion or streamed completion for an ordered list of prompt messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply for `messages` in one request.
    async fn complete(
        &self,
        credentials: &Credentials,
        messages: Vec<ChatMessage>,
    ) -> Result<String, LlmError>;

    /// Starts a streamed completion. HTTP status errors are returned before any fragment.
    async fn stream(
        &self,
        credentials: &Credentials,
        messages: Vec<ChatMessage>,
    ) -> Result<TextStream, LlmError>;
}

/// Receives the progress of a streamed completion.
#[async_trait]
pub trait StreamObserver: Send {
    /// Called for every non-empty fragment with the fragment and the text accumulated so far.
    async fn on_fragment(&mut self, _delta: &str, _full: &str) {}

    /// Called once when the stream ends normally.
    async fn on_complete(&mut self, _full: &str) {}

    /// Called once when the stream fails; no further callbacks follow.
    async fn on_error(&mut self, _error: &LlmError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}

/// Consumes `stream`, accumulating the full text and notifying `observer`.
///
/// Returns the full text, or the first error (after `on_error`).
pub async fn drive_stream(
    mut stream: TextStream,
    observer: &mut dyn StreamObserver,
) -> Result<String, LlmError> {
    let mut full = String::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(delta) => {
                if delta.is_empty() {
                    continue;
                }
                full.push_str(&delta);
                observer.on_fragment(&delta, &full).await;
            }
            Err(e) => {
                observer.on_error(&e).await;
                return Err(e);
            }
        }
    }
    observer.on_complete(&full).await;
    Ok(full)
}
