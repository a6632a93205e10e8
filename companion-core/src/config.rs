//! Application config from environment variables.
//!
//! | Variable            | Default                         |
//! |---------------------|---------------------------------|
//! | `XAI_API_KEY`       | empty                           |
//! | `XAI_MODEL`         | `grok-4-1-fast-reasoning`       |
//! | `XAI_BASE_URL`      | `https://api.x.ai/v1/responses` |
//! | `DATABASE_URL`      | `sqlite://./data/companion.db`  |
//! | `MEMORY_STORE_TYPE` | `sqlite`                        |
//! | `LOG_FILE`          | `logs/companion.log`            |

use std::env;
use std::fmt;
use std::str::FromStr;

use llm_client::{mask_token, DEFAULT_ENDPOINT};
use memory_core::DEFAULT_MODEL_NAME;

use crate::error::{CompanionError, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/companion.db";
pub const DEFAULT_LOG_FILE: &str = "logs/companion.log";

/// Key-value backend selected by `MEMORY_STORE_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for StoreType {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreType::Sqlite),
            "memory" | "inmemory" => Ok(StoreType::Memory),
            other => Err(CompanionError::Config(format!(
                "MEMORY_STORE_TYPE must be sqlite or memory, got {other:?}"
            ))),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Seeds the settings record when it has no key. May be empty.
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub database_url: String,
    pub store_type: StoreType,
    pub log_file: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &mask_token(&self.api_key))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("database_url", &self.database_url)
            .field("store_type", &self.store_type)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let store_type = match lookup("MEMORY_STORE_TYPE").filter(|v| !v.trim().is_empty()) {
            Some(value) => value.parse()?,
            None => StoreType::default(),
        };

        Ok(Self {
            api_key: var("XAI_API_KEY", ""),
            model: var("XAI_MODEL", DEFAULT_MODEL_NAME),
            endpoint: var("XAI_BASE_URL", DEFAULT_ENDPOINT),
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            store_type,
            log_file: var("LOG_FILE", DEFAULT_LOG_FILE),
        })
    }
}
