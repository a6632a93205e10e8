//! Composer input and output types.

use chrono::{DateTime, Utc};
use llm_client::Credentials;
use memory_core::{CharacterProfile, ChatRecord, EmotionalContextMap};
use prompt::{ChatMessage, ConversationType};

use crate::tokens::{estimate_message_tokens, TokenUsage};

/// Everything the composer reads for one turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnInput<'a> {
    /// The user's new utterance.
    pub current_text: &'a str,
    /// Snapshot of the conversation before the utterance. `None` when unavailable.
    pub history: Option<&'a [ChatRecord]>,
    pub conversation_id: &'a str,
    pub character: Option<&'a CharacterProfile>,
    /// Used only by the summarization fallback.
    pub credentials: &'a Credentials,
    /// Emotional state of every conversation, as currently stored.
    pub emotional_context: &'a EmotionalContextMap,
}

/// How messages older than the recent window were represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OlderContext {
    /// Fewer older messages than the threshold.
    NotNeeded,
    /// This many retrieved messages were included.
    Retrieved(usize),
    /// One summary note was included.
    Summarized,
    /// Neither retrieval nor summarization produced anything.
    Omitted,
}

/// A composed prompt ready for the model.
#[derive(Debug, Clone)]
pub struct Context {
    pub messages: Vec<ChatMessage>,
    pub metadata: ContextMetadata,
}

/// Diagnostic information about a composed prompt.
#[derive(Debug, Clone)]
pub struct ContextMetadata {
    pub conversation_id: String,
    pub conversation_type: ConversationType,
    pub older_context: OlderContext,
    /// True when the list had to be cut to the budget.
    pub truncated: bool,
    /// Estimated tokens of the final list.
    pub total_tokens: usize,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Context {
    pub(crate) fn empty(conversation_id: &str) -> Self {
        Self {
            messages: Vec::new(),
            metadata: ContextMetadata {
                conversation_id: conversation_id.to_string(),
                conversation_type: ConversationType::Normal,
                older_context: OlderContext::NotNeeded,
                truncated: false,
                total_tokens: 0,
                message_count: 0,
                created_at: Utc::now(),
            },
        }
    }

    /// True when there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn exceeds_limit(&self, limit: usize) -> bool {
        estimate_message_tokens(&self.messages) > limit
    }

    /// Token usage against a context window of `max` tokens.
    pub fn usage(&self, max: usize) -> TokenUsage {
        TokenUsage::from_messages(&self.messages, max)
    }
}
