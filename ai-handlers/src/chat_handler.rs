//! Chat handler: one user turn from utterance to stored reply.
//!
//! **External interactions:** model API (via `LlmClient`), persistence (character, chat, settings stores).

use std::error::Error as _;
use std::sync::Arc;

use llm_client::{drive_stream, format_error_message, Credentials, LlmClient, LlmError, StreamObserver};
use memory::{Context, ContextComposer, TurnInput};
use memory_core::ChatRecord;
use storage::{CharacterStore, ChatStore, SettingsStore, StorageError};
use tracing::{debug, error, info, instrument};

use crate::history_observer::HistoryObserver;

// --- User-facing assistant messages ---
pub const MSG_MISSING_API_KEY: &str =
    "API 키가 없어서 답변을 드릴 수 없어요. 설정에서 등록해 주세요! 🔑";
pub const MSG_NO_RESPONSE: &str = "응답을 받을 수 없었습니다.";

/// Result of [`ChatHandler::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank text or unknown character; nothing was stored.
    Skipped,
    /// No API key configured; the notice was appended.
    MissingApiKey,
    /// The reply was streamed into the assistant message `message_id`.
    Replied { message_id: String, text: String },
    /// The stream completed without any text; the fallback message was appended.
    NoResponse,
    /// The model call failed; `message` is the appended error text.
    Failed {
        status: Option<u16>,
        message: String,
    },
}

/// Runs chat turns against the stores and the model client.
pub struct ChatHandler {
    characters: Arc<CharacterStore>,
    chats: Arc<ChatStore>,
    settings: Arc<SettingsStore>,
    llm: Arc<dyn LlmClient>,
    composer: ContextComposer,
}

impl ChatHandler {
    pub fn new(
        characters: Arc<CharacterStore>,
        chats: Arc<ChatStore>,
        settings: Arc<SettingsStore>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            composer: ContextComposer::new(llm.clone()),
            characters,
            chats,
            settings,
            llm,
        }
    }

    /// Logs an error and its source chain. First item with `first_msg`, rest with "Caused by".
    fn log_error_chain(e: &LlmError, first_msg: &str) {
        error!(cause = %e, status = ?e.status(), "{}", first_msg);
        let mut source = e.source();
        while let Some(cause) = source {
            error!(cause = %cause, "Caused by");
            source = cause.source();
        }
    }

    async fn append_assistant(&self, conversation_id: &str, text: &str) -> Result<(), StorageError> {
        self.chats
            .add_message(conversation_id, ChatRecord::assistant(text))
            .await
    }

    async fn fail(&self, conversation_id: &str, e: &LlmError) -> Result<TurnOutcome, StorageError> {
        Self::log_error_chain(e, "Model call failed");
        let message = format_error_message(e);
        self.append_assistant(conversation_id, &message).await?;
        Ok(TurnOutcome::Failed {
            status: e.status(),
            message,
        })
    }

    async fn credentials(&self) -> Result<Option<Credentials>, StorageError> {
        let settings = self.settings.get().await?;
        if !settings.has_api_key() {
            return Ok(None);
        }
        Ok(Some(Credentials::new(settings.api_key, settings.model_name)))
    }

    /// Sends `text` to the character `conversation_id` and streams the reply into history.
    ///
    /// `observer` sees every fragment. Storage failures are returned; model
    /// failures are stored as an assistant error message and reported in the outcome.
    #[instrument(skip(self, text, observer), fields(text_len = text.len()))]
    pub async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
        observer: &mut dyn StreamObserver,
    ) -> Result<TurnOutcome, StorageError> {
        if text.trim().is_empty() {
            return Ok(TurnOutcome::Skipped);
        }
        let Some(character) = self.characters.get(conversation_id).await? else {
            info!("Unknown character, skipping turn");
            return Ok(TurnOutcome::Skipped);
        };

        let snapshot = self.chats.history(conversation_id).await?;
        self.chats
            .add_message(conversation_id, ChatRecord::user(text))
            .await?;

        let Some(credentials) = self.credentials().await? else {
            info!("No API key configured");
            self.append_assistant(conversation_id, MSG_MISSING_API_KEY)
                .await?;
            return Ok(TurnOutcome::MissingApiKey);
        };

        let emotional_context = self.chats.emotional_context().await?;
        let messages = self
            .composer
            .prepare_messages(
                TurnInput {
                    current_text: text,
                    history: Some(snapshot.as_slice()),
                    conversation_id,
                    character: Some(&character),
                    credentials: &credentials,
                    emotional_context: &emotional_context,
                },
                Some(self.chats.as_ref()),
            )
            .await;
        if messages.is_empty() {
            return self.fail(conversation_id, &LlmError::NoMessages).await;
        }

        info!(
            message_count = messages.len(),
            model = %credentials.model,
            "Submitting to model (streaming)"
        );
        let stream = match self.llm.stream(&credentials, messages).await {
            Ok(stream) => stream,
            Err(e) => return self.fail(conversation_id, &e).await,
        };

        let mut history_observer = HistoryObserver::new(&self.chats, conversation_id, observer);
        let result = drive_stream(stream, &mut history_observer).await;
        let message_id = history_observer.message_id().map(str::to_string);

        match (result, message_id) {
            (Ok(text), Some(message_id)) => {
                debug!(message_id = %message_id, reply_len = text.len(), "Reply stored");
                Ok(TurnOutcome::Replied { message_id, text })
            }
            (Ok(_), None) => {
                info!("Stream finished without text");
                self.append_assistant(conversation_id, MSG_NO_RESPONSE)
                    .await?;
                Ok(TurnOutcome::NoResponse)
            }
            (Err(e), _) => self.fail(conversation_id, &e).await,
        }
    }

    /// Composes the prompt the next turn would send, without persisting anything.
    ///
    /// Returns `None` for unknown characters. Without an API key the
    /// summarization fallback yields nothing and older messages are omitted.
    pub async fn preview_context(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Option<Context>, StorageError> {
        let Some(character) = self.characters.get(conversation_id).await? else {
            return Ok(None);
        };
        let history = self.chats.history(conversation_id).await?;
        let emotional_context = self.chats.emotional_context().await?;
        let settings = self.settings.get().await?;
        let credentials = Credentials::new(settings.api_key, settings.model_name);

        let context = self
            .composer
            .compose(
                TurnInput {
                    current_text: text,
                    history: Some(history.as_slice()),
                    conversation_id,
                    character: Some(&character),
                    credentials: &credentials,
                    emotional_context: &emotional_context,
                },
                None,
            )
            .await;
        Ok(Some(context))
    }
}
