//! Chat histories and emotional context, keyed by conversation id.
//!
//! The conversation id is the character id: one conversation per character.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use memory_core::{
    ChatRecord, EmotionalContextMap, EmotionalState, EmotionalStateWriter, KeyValueStore,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::records::{read_record, write_record, CHAT_HISTORY_KEY, EMOTIONAL_CONTEXT_KEY};
use crate::StorageError;

type HistoryMap = BTreeMap<String, Vec<ChatRecord>>;

pub struct ChatStore {
    kv: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl ChatStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            lock: Mutex::new(()),
        }
    }

    async fn histories(&self) -> Result<HistoryMap, StorageError> {
        read_record(self.kv.as_ref(), CHAT_HISTORY_KEY).await
    }

    /// Read-modify-write of the history map under the store lock.
    async fn modify_histories<R>(
        &self,
        edit: impl FnOnce(&mut HistoryMap) -> R,
    ) -> Result<R, StorageError> {
        let _guard = self.lock.lock().await;
        let mut histories = self.histories().await?;
        let result = edit(&mut histories);
        write_record(self.kv.as_ref(), CHAT_HISTORY_KEY, &histories).await?;
        Ok(result)
    }

    /// Snapshot of one conversation, oldest first. Empty when unknown.
    pub async fn history(&self, conversation_id: &str) -> Result<Vec<ChatRecord>, StorageError> {
        let mut histories = self.histories().await?;
        Ok(histories.remove(conversation_id).unwrap_or_default())
    }

    pub async fn add_message(
        &self,
        conversation_id: &str,
        record: ChatRecord,
    ) -> Result<(), StorageError> {
        debug!(conversation_id = %conversation_id, message_id = %record.id, role = record.role.as_str(), "Appending message");
        self.modify_histories(|histories| {
            histories
                .entry(conversation_id.to_string())
                .or_default()
                .push(record);
        })
        .await
    }

    /// Replaces the text of one message in place. Returns whether the message was found.
    pub async fn update_message_text(
        &self,
        conversation_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<bool, StorageError> {
        self.modify_histories(|histories| {
            let record = histories
                .get_mut(conversation_id)
                .and_then(|h| h.iter_mut().find(|r| r.id == message_id));
            match record {
                Some(record) => {
                    record.content = text.to_string();
                    true
                }
                None => false,
            }
        })
        .await
    }

    pub async fn set_history(
        &self,
        conversation_id: &str,
        history: Vec<ChatRecord>,
    ) -> Result<(), StorageError> {
        self.modify_histories(|histories| {
            histories.insert(conversation_id.to_string(), history);
        })
        .await
    }

    pub async fn clear_history(&self, conversation_id: &str) -> Result<(), StorageError> {
        self.modify_histories(|histories| {
            histories.remove(conversation_id);
        })
        .await
    }

    /// Emotional state of every conversation.
    pub async fn emotional_context(&self) -> Result<EmotionalContextMap, StorageError> {
        read_record(self.kv.as_ref(), EMOTIONAL_CONTEXT_KEY).await
    }

    /// Emotional state of one conversation, `{happy, "", friend}` when absent.
    pub async fn emotional_state(&self, conversation_id: &str) -> Result<EmotionalState, StorageError> {
        let mut context = self.emotional_context().await?;
        Ok(context.remove(conversation_id).unwrap_or_default())
    }

    /// Replaces one conversation's entry; other entries are preserved.
    pub async fn set_emotional_state(
        &self,
        conversation_id: &str,
        state: EmotionalState,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut context = self.emotional_context().await?;
        context.insert(conversation_id.to_string(), state);
        write_record(self.kv.as_ref(), EMOTIONAL_CONTEXT_KEY, &context).await
    }
}

#[async_trait]
impl EmotionalStateWriter for ChatStore {
    async fn set_emotional_state(
        &self,
        conversation_id: &str,
        state: EmotionalState,
    ) -> anyhow::Result<()> {
        ChatStore::set_emotional_state(self, conversation_id, state).await?;
        Ok(())
    }
}
