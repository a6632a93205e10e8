//! Emotional state tracking.
//!
//! Pure functions: the caller owns the map and persists whatever is returned.

use memory_core::{EmotionalContextMap, EmotionalState, Mood};
use prompt::ConversationType;

/// Longest topic kept, in characters.
pub const TOPIC_MAX_CHARS: usize = 50;

/// Mood the character takes on for a conversation type.
pub fn mood_for(conversation_type: ConversationType) -> Mood {
    match conversation_type {
        ConversationType::EmotionalSupport => Mood::Caring,
        ConversationType::Happy => Mood::Happy,
        ConversationType::Intimate | ConversationType::Normal => Mood::Normal,
    }
}

/// Next state of one conversation.
///
/// The topic becomes the first 50 characters of `topic_text`, or stays as it
/// was when `topic_text` is empty. The relationship level is carried over.
pub fn next_emotional_state(
    previous: Option<&EmotionalState>,
    conversation_type: ConversationType,
    topic_text: &str,
) -> EmotionalState {
    let last_topic = if topic_text.is_empty() {
        previous.map(|s| s.last_topic.clone()).unwrap_or_default()
    } else {
        topic_text.chars().take(TOPIC_MAX_CHARS).collect()
    };

    EmotionalState {
        mood: mood_for(conversation_type),
        last_topic,
        relationship_level: previous.map(|s| s.relationship_level).unwrap_or_default(),
    }
}

/// Returns a copy of `current` with the entry for `conversation_id` updated.
pub fn update_emotional_context(
    current: &EmotionalContextMap,
    conversation_id: &str,
    conversation_type: ConversationType,
    topic_text: &str,
) -> EmotionalContextMap {
    let state = next_emotional_state(current.get(conversation_id), conversation_type, topic_text);
    let mut next = current.clone();
    next.insert(conversation_id.to_string(), state);
    next
}
