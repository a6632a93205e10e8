//! # Context Composer
//!
//! Assembles the ordered prompt for one chat turn.
//!
//! ## Message order
//!
//! 1. System: persona prompt, with the conversation-type amendment when the type is not normal
//! 2. System: emotional-context note reflecting the updated state
//! 3. Older context, only when at least [`SUMMARY_THRESHOLD`] messages precede the recent window:
//!    retrieved messages, or one summary note when retrieval finds nothing
//! 4. The last [`RECENT_COUNT`] history messages
//! 5. User: the current utterance
//!
//! The list is truncated to [`MAX_CONTEXT_TOKENS`] (system messages kept) and
//! blank messages are dropped.
//!
//! ## Example
//!
//! ```rust,no_run
//! use memory::{ContextComposer, TurnInput};
//! use memory_core::{default_characters, EmotionalContextMap};
//! use llm_client::{Credentials, ResponsesClient};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let composer = ContextComposer::new(Arc::new(ResponsesClient::new()));
//! let character = default_characters().remove(0);
//! let credentials = Credentials::new("xai-key", "grok-4-1-fast-reasoning");
//! let emotional_context = EmotionalContextMap::new();
//! let history = Vec::new();
//!
//! let messages = composer
//!     .prepare_messages(
//!         TurnInput {
//!             current_text: "오늘 뭐 했어?",
//!             history: Some(history.as_slice()),
//!             conversation_id: &character.id,
//!             character: Some(&character),
//!             credentials: &credentials,
//!             emotional_context: &emotional_context,
//!         },
//!         None,
//!     )
//!     .await;
//! # }
//! ```

mod composer;
mod types;

pub use composer::ContextComposer;
pub use types::{Context, ContextMetadata, OlderContext, TurnInput};

/// Size of the recent window always sent verbatim.
pub const RECENT_COUNT: usize = 8;

/// Older-message count from which retrieval or summarization kicks in.
pub const SUMMARY_THRESHOLD: usize = 10;

/// Prompt budget, about 80% of the model's nominal window.
pub const MAX_CONTEXT_TOKENS: usize = 100_000;

/// Share of [`MAX_CONTEXT_TOKENS`] given to retrieved older messages.
pub const RETRIEVAL_SHARE: f64 = 0.3;
