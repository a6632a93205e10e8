//! # Memory Crate
//!
//! Decides, for every outgoing chat turn, which prior messages go into the
//! bounded prompt sent to the model.
//!
//! ## Modules
//!
//! - [`tokens`] - Token estimation, truncation to a budget, usage tracking
//! - [`emotion`] - Per-conversation emotional state updates
//! - [`summarize`] - Summarization fallback for older messages
//! - [`context`] - The context composer tying the pipeline together
//!
//! ## Data flow
//!
//! utterance → conversation type → emotional state update → hybrid retrieval over
//! older messages (or a summary when nothing is retrieved) → persona prompt,
//! emotional note, older context, recent window, utterance → truncation to budget.
//!
//! ## External Interactions
//!
//! - **Model API**: summarization issues one non-streaming call through `llm_client::LlmClient`
//! - **Persistence**: the updated emotional state is written through `memory_core::EmotionalStateWriter`

pub mod context;
pub mod emotion;
pub mod summarize;
pub mod tokens;

pub use context::{
    Context, ContextComposer, ContextMetadata, OlderContext, TurnInput, MAX_CONTEXT_TOKENS,
    RECENT_COUNT, RETRIEVAL_SHARE, SUMMARY_THRESHOLD,
};
pub use emotion::{mood_for, next_emotional_state, update_emotional_context, TOPIC_MAX_CHARS};
pub use summarize::summarize_messages;
pub use tokens::{
    calculate_usage_rate, estimate_message_tokens, estimate_tokens, truncate_messages,
    TokenUsage, NOMINAL_CONTEXT_TOKENS,
};
