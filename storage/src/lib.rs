//! Storage crate: persistence service objects over a [`KeyValueStore`](memory_core::KeyValueStore).
//!
//! Each store owns one logical record, kept as a single JSON document:
//!
//! | Store              | Record key                                               |
//! |--------------------|----------------------------------------------------------|
//! | [`CharacterStore`] | `companion_characters`                                   |
//! | [`ChatStore`]      | `companion_chat_history`, `companion_emotional_context`  |
//! | [`SettingsStore`]  | `companion_settings`                                     |
//!
//! Absent or malformed records read as their default. Writes are
//! read-modify-write under the store's async mutex, so share one instance of
//! each store (behind an `Arc`) per backend.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`records`] – Record keys and JSON helpers
//! - [`character_store`] – CharacterStore
//! - [`chat_store`] – ChatStore
//! - [`settings_store`] – SettingsStore

pub mod character_store;
pub mod chat_store;
pub mod error;
pub mod records;
pub mod settings_store;

pub use character_store::CharacterStore;
pub use chat_store::ChatStore;
pub use error::StorageError;
pub use records::{CHARACTERS_KEY, CHAT_HISTORY_KEY, EMOTIONAL_CONTEXT_KEY, SETTINGS_KEY};
pub use settings_store::SettingsStore;
