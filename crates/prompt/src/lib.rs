//! # Prompt
//!
//! Builds the pieces of the prompt sent to the model.
//!
//! ## Message order produced by the context composer
//!
//! - **System**: persona prompt for the character, plus an amendment for the detected conversation type
//! - **System**: emotional-context note (`[상황] 기분:… 주제:… 관계:…`)
//! - Optional retrieved older messages, or one **System** summary note
//! - Recent conversation (user/assistant)
//! - **User**: current utterance
//!
//! ## External interactions
//!
//! - **AI models**: [`ChatMessage`] serializes to the wire unit `{ "role": ..., "content": ... }`.

mod conversation_type;
mod persona;

use memory_core::{EmotionalContextMap, Role};
use serde::{Deserialize, Serialize};

pub use conversation_type::{adjust_prompt_for_context, detect_conversation_type, ConversationType};
pub use persona::build_system_prompt;

/// Role of a prompt message, one-to-one with the API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    /// Maps a history author to a prompt role: user stays user, everything else is the assistant.
    pub fn from_history_role(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant | Role::System => MessageRole::Assistant,
        }
    }
}

/// A single prompt message, one element of the request `input` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }

    /// True when the message can be sent: content is non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Title line of the summary note.
pub const SUMMARY_TITLE: &str = "[이전 대화 요약]";

/// Closing instruction of the summary note.
pub const SUMMARY_FOOTER: &str = "위 요약을 참고하되, 최근 대화에 집중하여 답변해주세요.";

/// Instruction that opens the summarization request.
pub const SUMMARY_INSTRUCTION: &str = "다음 대화 내용을 간단히 요약해주세요. 중요한 정보, 맥락, 사용자의 선호도나 특별한 요구사항만 포함하세요. 불필요한 세부사항은 생략하세요:";

/// Placeholder shown when the conversation has no topic yet.
pub const NO_TOPIC: &str = "없음";

/// Builds the emotional-context system note for a conversation.
///
/// Missing entries render as `mood: normal`, no topic, `relationship: friend`.
pub fn build_emotional_context_message(
    emotional_context: &EmotionalContextMap,
    conversation_id: &str,
) -> ChatMessage {
    let (mood, topic, relationship) = match emotional_context.get(conversation_id) {
        Some(state) => (
            state.mood.as_str(),
            if state.last_topic.is_empty() {
                NO_TOPIC
            } else {
                state.last_topic.as_str()
            },
            state.relationship_level.as_str(),
        ),
        None => ("normal", NO_TOPIC, "friend"),
    };
    ChatMessage::system(format!(
        "[상황] 기분:{} 주제:{} 관계:{}",
        mood, topic, relationship
    ))
}

/// Wraps a produced summary into the system note appended in place of older messages.
pub fn build_summary_message(summary: &str) -> ChatMessage {
    ChatMessage::system(format!(
        "{}\n{}\n\n{}",
        SUMMARY_TITLE,
        summary.trim(),
        SUMMARY_FOOTER
    ))
}

/// Builds the single user message asking the model to summarize `messages`.
///
/// Each message is rendered as a `role: content` line.
pub fn build_summary_request(messages: &[ChatMessage]) -> ChatMessage {
    let transcript = messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n");
    ChatMessage::user(format!("{}\n\n{}", SUMMARY_INSTRUCTION, transcript))
}
