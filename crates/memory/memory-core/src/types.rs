//! # Core Types
//!
//! ## Role
//!
//! Author of a chat record: `User`, `Assistant` or `System`.
//!
//! ## ChatRecord
//!
//! One message in a conversation history. Histories are ordered by insertion,
//! which is also chronological order.
//!
//! ## EmotionalState
//!
//! Small mood/topic/relationship record kept per conversation.
//!
//! ## Settings
//!
//! Credentials and model id used for model calls.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Model used when the settings record names none.
pub const DEFAULT_MODEL_NAME: &str = "grok-4-1-fast-reasoning";

/// Represents the author of a message in a conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Older records stored the character's replies as `"bot"`.
    #[serde(alias = "bot")]
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single message in a conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRecord {
    /// Opaque identifier, unique within the conversation.
    pub id: String,
    /// Who wrote the message.
    #[serde(alias = "sender")]
    pub role: Role,
    /// Message body. Grows in place while an assistant reply is streaming.
    #[serde(alias = "text", default)]
    pub content: String,
    /// Display time (`HH:MM`, local clock).
    #[serde(default)]
    pub time: String,
}

impl ChatRecord {
    /// Creates a record with a fresh UUID and the current local display time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            time: Local::now().format("%H:%M").to_string(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// True when the content is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Current mood of the character towards the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Caring,
    Normal,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Caring => "caring",
            Mood::Normal => "normal",
        }
    }
}

/// How close the character and the user are. Carried over unchanged between turns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipLevel {
    #[default]
    Friend,
    Close,
    Partner,
}

impl RelationshipLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipLevel::Friend => "friend",
            RelationshipLevel::Close => "close",
            RelationshipLevel::Partner => "partner",
        }
    }
}

/// Emotional state of one conversation.
///
/// Defaults to `{ mood: happy, lastTopic: "", relationshipLevel: friend }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionalState {
    pub mood: Mood,
    /// At most 50 characters.
    pub last_topic: String,
    pub relationship_level: RelationshipLevel,
}

/// Emotional state keyed by conversation identifier.
pub type EmotionalContextMap = BTreeMap<String, EmotionalState>;

/// Credentials and model id for the model API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub model_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
