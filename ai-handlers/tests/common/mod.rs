//! Shared fixtures: in-memory stores and a scripted streaming model client.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ai_handlers::ChatHandler;
use async_trait::async_trait;
use futures::StreamExt;
use llm_client::{Credentials, LlmClient, LlmError, StreamObserver, TextStream};
use memory_inmemory::InMemoryKvStore;
use prompt::ChatMessage;
use storage::{CharacterStore, ChatStore, SettingsStore};

type Script = Box<dyn Fn() -> Result<Vec<Result<String, LlmError>>, LlmError> + Send + Sync>;

/// Model client whose `stream` replays a script and records every request.
pub struct StreamingLlm {
    script: Script,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StreamingLlm {
    /// Streams `fragments` then ends normally.
    pub fn fragments(fragments: &[&str]) -> Self {
        let owned: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
        Self::scripted(move || Ok(owned.iter().cloned().map(Ok).collect()))
    }

    /// Refuses the request with `status` before any fragment.
    pub fn rejecting(status: u16) -> Self {
        Self::scripted(move || Err(LlmError::from_status(status, "rejected")))
    }

    pub fn scripted<F>(script: F) -> Self
    where
        F: Fn() -> Result<Vec<Result<String, LlmError>>, LlmError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for StreamingLlm {
    async fn complete(
        &self,
        _credentials: &Credentials,
        _messages: Vec<ChatMessage>,
    ) -> Result<String, LlmError> {
        Ok("이전 대화 요약".to_string())
    }

    async fn stream(
        &self,
        _credentials: &Credentials,
        messages: Vec<ChatMessage>,
    ) -> Result<TextStream, LlmError> {
        self.requests.lock().unwrap().push(messages);
        let items = (self.script)()?;
        Ok(futures::stream::iter(items).boxed())
    }
}

/// Observer that records fragments and terminal events.
#[derive(Default)]
pub struct RecordingObserver {
    pub fragments: Vec<String>,
    pub completed: Option<String>,
    pub errors: usize,
}

#[async_trait]
impl StreamObserver for RecordingObserver {
    async fn on_fragment(&mut self, delta: &str, _full: &str) {
        self.fragments.push(delta.to_string());
    }

    async fn on_complete(&mut self, full: &str) {
        self.completed = Some(full.to_string());
    }

    async fn on_error(&mut self, _error: &LlmError) {
        self.errors += 1;
    }
}

pub struct Fixture {
    pub handler: ChatHandler,
    pub chats: Arc<ChatStore>,
    pub settings: Arc<SettingsStore>,
    pub llm: Arc<StreamingLlm>,
}

/// Handler over fresh in-memory stores, with an API key configured.
pub async fn fixture(llm: StreamingLlm) -> Fixture {
    let fixture = fixture_without_key(llm);
    fixture.settings.set_api_key("xai-test-key-123456").await.unwrap();
    fixture
}

pub fn fixture_without_key(llm: StreamingLlm) -> Fixture {
    let kv = Arc::new(InMemoryKvStore::new());
    let characters = Arc::new(CharacterStore::new(kv.clone()));
    let chats = Arc::new(ChatStore::new(kv.clone()));
    let settings = Arc::new(SettingsStore::new(kv));
    let llm = Arc::new(llm);
    let handler = ChatHandler::new(characters, chats.clone(), settings.clone(), llm.clone());
    Fixture {
        handler,
        chats,
        settings,
        llm,
    }
}
