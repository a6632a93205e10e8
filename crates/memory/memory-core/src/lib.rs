//! # memory-core
//!
//! Core types and traits shared by the context pipeline and the persistence layer.
//!
//! - [`types`]: chat records, emotional state, settings
//! - [`character`]: character profiles, personalities, validation, defaults
//! - [`store`]: the [`KeyValueStore`] persistence contract and the [`EmotionalStateWriter`] setter
//!
//! ## External Interactions
//!
//! - **storage**: service objects read/write these types as JSON records through a `KeyValueStore`
//! - **memory**: the context composer reads `ChatRecord` snapshots and writes `EmotionalState`

pub mod character;
pub mod store;
pub mod types;

pub use character::{default_characters, validate_character, CharacterProfile, Personality};
pub use store::{EmotionalStateWriter, KeyValueStore};
pub use types::{
    ChatRecord, EmotionalContextMap, EmotionalState, Mood, RelationshipLevel, Role, Settings,
    DEFAULT_MODEL_NAME,
};
