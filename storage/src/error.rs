//! Storage error types.
//!
//! Used by the stores and their callers.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Character not found: {0}")]
    CharacterNotFound(String),
    #[error("Invalid character: {}", .0.join(", "))]
    InvalidCharacter(Vec<String>),
}
