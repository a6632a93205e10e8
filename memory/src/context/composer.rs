//! Context composer: one prompt per chat turn.
//!
//! External: model API (summarization only), emotional state persistence.

use std::sync::Arc;

use chrono::Utc;
use llm_client::{Credentials, LlmClient};
use memory_core::{ChatRecord, EmotionalStateWriter};
use memory_strategies::HybridRetrievalStrategy;
use prompt::{
    adjust_prompt_for_context, build_emotional_context_message, build_summary_message,
    build_system_prompt, detect_conversation_type, ChatMessage, MessageRole,
};
use tracing::{debug, info, instrument, warn};

use super::types::{Context, ContextMetadata, OlderContext, TurnInput};
use super::{MAX_CONTEXT_TOKENS, RECENT_COUNT, RETRIEVAL_SHARE, SUMMARY_THRESHOLD};
use crate::emotion::update_emotional_context;
use crate::summarize::summarize_messages;
use crate::tokens::{estimate_message_tokens, truncate_messages};

/// Builds prompts from history, character, and emotional state.
///
/// Holds the model client used by the summarization fallback and the
/// retrieval strategy used for older messages.
pub struct ContextComposer {
    llm: Arc<dyn LlmClient>,
    retrieval: HybridRetrievalStrategy,
}

impl ContextComposer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            retrieval: HybridRetrievalStrategy::default(),
        }
    }

    /// Replaces the retrieval strategy.
    pub fn with_retrieval(mut self, retrieval: HybridRetrievalStrategy) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Token budget handed to retrieval.
    pub fn retrieval_budget() -> usize {
        (MAX_CONTEXT_TOKENS as f64 * RETRIEVAL_SHARE) as usize
    }

    /// Returns the ordered prompt messages for this turn; empty when there is nothing to send.
    pub async fn prepare_messages(
        &self,
        input: TurnInput<'_>,
        writer: Option<&dyn EmotionalStateWriter>,
    ) -> Vec<ChatMessage> {
        self.compose(input, writer).await.messages
    }

    /// Composes the prompt and reports how it was built.
    ///
    /// Persists the updated emotional state through `writer` before composing;
    /// a failed write is logged and the turn continues. Missing character or
    /// history yields an empty context.
    #[instrument(
        skip_all,
        fields(
            conversation_id = %input.conversation_id,
            history_len = input.history.map(|h| h.len()).unwrap_or(0)
        )
    )]
    pub async fn compose(
        &self,
        input: TurnInput<'_>,
        writer: Option<&dyn EmotionalStateWriter>,
    ) -> Context {
        let conversation_id = input.conversation_id;
        let (Some(character), Some(history)) = (input.character, input.history) else {
            debug!("Missing character or history, nothing to compose");
            return Context::empty(conversation_id);
        };

        let conversation_type = detect_conversation_type(input.current_text);
        let emotional_context = update_emotional_context(
            input.emotional_context,
            conversation_id,
            conversation_type,
            input.current_text,
        );
        if let (Some(writer), Some(state)) = (writer, emotional_context.get(conversation_id)) {
            if let Err(e) = writer
                .set_emotional_state(conversation_id, state.clone())
                .await
            {
                warn!(error = %e, "Failed to persist emotional state");
            }
        }

        // Retrieval and the old/recent split must see the same sequence.
        let visible: Vec<ChatRecord> = history
            .iter()
            .filter(|record| !record.is_blank())
            .cloned()
            .collect();
        let all: Vec<ChatMessage> = visible
            .iter()
            .map(|record| ChatMessage {
                role: MessageRole::from_history_role(record.role),
                content: record.content.clone(),
            })
            .collect();
        let (old, recent) = all.split_at(all.len().saturating_sub(RECENT_COUNT));

        let persona = build_system_prompt(character);
        let mut messages = vec![
            ChatMessage::system(adjust_prompt_for_context(&persona, conversation_type)),
            build_emotional_context_message(&emotional_context, conversation_id),
        ];

        let older_context = if old.len() >= SUMMARY_THRESHOLD {
            self.attach_older_context(input.current_text, &visible, old, input.credentials, &mut messages)
                .await
        } else {
            OlderContext::NotNeeded
        };

        messages.extend_from_slice(recent);
        messages.push(ChatMessage::user(input.current_text));

        let estimated = estimate_message_tokens(&messages);
        let truncated = estimated > MAX_CONTEXT_TOKENS;
        if truncated {
            warn!(
                estimated_tokens = estimated,
                max_tokens = MAX_CONTEXT_TOKENS,
                "Prompt over budget, truncating"
            );
            messages = truncate_messages(&messages, MAX_CONTEXT_TOKENS, true);
        }

        messages.retain(ChatMessage::is_valid);

        let total_tokens = estimate_message_tokens(&messages);
        info!(
            conversation_type = conversation_type.as_str(),
            older_context = ?older_context,
            message_count = messages.len(),
            total_tokens,
            truncated,
            "Context composed"
        );

        Context {
            metadata: ContextMetadata {
                conversation_id: conversation_id.to_string(),
                conversation_type,
                older_context,
                truncated,
                total_tokens,
                message_count: messages.len(),
                created_at: Utc::now(),
            },
            messages,
        }
    }

    /// Appends retrieved older messages, or a summary note when retrieval finds nothing.
    async fn attach_older_context(
        &self,
        query: &str,
        history: &[ChatRecord],
        old: &[ChatMessage],
        credentials: &Credentials,
        messages: &mut Vec<ChatMessage>,
    ) -> OlderContext {
        let retrieved =
            self.retrieval
                .retrieve(query, history, Self::retrieval_budget(), RECENT_COUNT);
        if !retrieved.is_empty() {
            let count = retrieved.len();
            messages.extend(retrieved);
            return OlderContext::Retrieved(count);
        }

        let summary = summarize_messages(self.llm.as_ref(), old, credentials).await;
        if summary.trim().is_empty() {
            debug!("No retrieval hits and no summary, older messages omitted");
            return OlderContext::Omitted;
        }
        messages.push(build_summary_message(&summary));
        OlderContext::Summarized
    }
}
