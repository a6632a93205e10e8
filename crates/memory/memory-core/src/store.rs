//! # Persistence Contracts
//!
//! ## KeyValueStore
//!
//! String key/value persistence. The storage layer keeps one JSON document per
//! logical record (characters, chat history, emotional context, settings).
//! There is no transactional guarantee across keys.
//!
//! ### Required Methods
//!
//! - `get(&self, key)`: returns `None` when the key is absent
//! - `set(&self, key, value)`: replaces the stored value
//! - `remove(&self, key)`: deletes the key; removing an absent key is not an error
//!
//! ## EmotionalStateWriter
//!
//! Setter handed to the context composer so it can persist the updated
//! emotional state of the conversation it is composing for.

use async_trait::async_trait;

use crate::types::EmotionalState;

/// Key-value persistence backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error>;

    async fn set(&self, key: &str, value: String) -> Result<(), anyhow::Error>;

    async fn remove(&self, key: &str) -> Result<(), anyhow::Error>;
}

/// Persists the emotional state of a single conversation.
///
/// Implementations must perform an atomic read-modify-write of the
/// conversation's entry: concurrent writes for the same conversation are
/// last-write-wins, writes for different conversations never clobber each other.
#[async_trait]
pub trait EmotionalStateWriter: Send + Sync {
    async fn set_emotional_state(
        &self,
        conversation_id: &str,
        state: EmotionalState,
    ) -> Result<(), anyhow::Error>;
}
