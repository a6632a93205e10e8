//! Chat turn handling.
//!
//! [`ChatHandler`] runs one user turn end to end: it appends the user message,
//! composes the prompt, streams the model reply into the conversation history,
//! and renders model failures as assistant messages.

mod chat_handler;
mod history_observer;

pub use chat_handler::{ChatHandler, TurnOutcome, MSG_MISSING_API_KEY, MSG_NO_RESPONSE};
