use llm_client::LlmError;
use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanionError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompanionError>;
