//! Stream observer that mirrors the reply into the conversation history.

use async_trait::async_trait;
use llm_client::{LlmError, StreamObserver};
use memory_core::ChatRecord;
use storage::ChatStore;
use tracing::error;

/// Materializes the assistant message on the first fragment and rewrites its
/// text on every fragment, then forwards each event to the caller's observer.
pub(crate) struct HistoryObserver<'a> {
    chats: &'a ChatStore,
    conversation_id: &'a str,
    message_id: Option<String>,
    inner: &'a mut dyn StreamObserver,
}

impl<'a> HistoryObserver<'a> {
    pub(crate) fn new(
        chats: &'a ChatStore,
        conversation_id: &'a str,
        inner: &'a mut dyn StreamObserver,
    ) -> Self {
        Self {
            chats,
            conversation_id,
            message_id: None,
            inner,
        }
    }

    /// Id of the materialized assistant message, if any fragment arrived.
    pub(crate) fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    async fn write(&mut self, full: &str) {
        let result = match self.message_id.clone() {
            Some(id) => self
                .chats
                .update_message_text(self.conversation_id, &id, full)
                .await
                .map(|_| ()),
            None => {
                let record = ChatRecord::assistant(full);
                let id = record.id.clone();
                let added = self.chats.add_message(self.conversation_id, record).await;
                if added.is_ok() {
                    self.message_id = Some(id);
                }
                added
            }
        };
        if let Err(e) = result {
            error!(
                conversation_id = %self.conversation_id,
                error = %e,
                "Failed to write streamed reply"
            );
        }
    }
}

#[async_trait]
impl StreamObserver for HistoryObserver<'_> {
    async fn on_fragment(&mut self, delta: &str, full: &str) {
        self.write(full).await;
        self.inner.on_fragment(delta, full).await;
    }

    async fn on_complete(&mut self, full: &str) {
        if self.message_id.is_some() {
            self.write(full).await;
        }
        self.inner.on_complete(full).await;
    }

    async fn on_error(&mut self, error: &LlmError) {
        self.inner.on_error(error).await;
    }
}
