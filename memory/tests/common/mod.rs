//! Shared fixtures for composer tests: a scripted model client and a recording state writer.

#![allow(dead_code)]

use async_trait::async_trait;
use llm_client::{Credentials, LlmClient, LlmError, TextStream};
use memory_core::{
    default_characters, CharacterProfile, ChatRecord, EmotionalState, EmotionalStateWriter, Role,
};
use prompt::ChatMessage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Model client whose `complete` replies with a fixed summary (or fails) and counts calls.
pub struct ScriptedLlm {
    summary: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn replying(summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            summary: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(
        &self,
        _credentials: &Credentials,
        messages: Vec<ChatMessage>,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages);
        match &self.summary {
            Some(summary) => Ok(summary.clone()),
            None => Err(LlmError::from_status(500, "Internal Server Error")),
        }
    }

    async fn stream(
        &self,
        _credentials: &Credentials,
        _messages: Vec<ChatMessage>,
    ) -> Result<TextStream, LlmError> {
        Err(LlmError::EmptyResponse)
    }
}

/// Writer that records every persisted state.
#[derive(Default)]
pub struct RecordingWriter {
    pub writes: Mutex<Vec<(String, EmotionalState)>>,
}

#[async_trait]
impl EmotionalStateWriter for RecordingWriter {
    async fn set_emotional_state(
        &self,
        conversation_id: &str,
        state: EmotionalState,
    ) -> anyhow::Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), state));
        Ok(())
    }
}

pub fn character() -> CharacterProfile {
    default_characters().remove(0)
}

pub fn credentials() -> Credentials {
    Credentials::new("xai-test-key-123456", "grok-test")
}

pub fn record(role: Role, content: &str) -> ChatRecord {
    ChatRecord::new(role, content)
}

/// `count` alternating user/assistant records with distinct English contents.
pub fn filler_history(count: usize) -> Vec<ChatRecord> {
    (0..count)
        .map(|i| {
            let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
            record(role, &format!("filler line {}", i))
        })
        .collect()
}
