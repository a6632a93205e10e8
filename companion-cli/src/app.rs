//! Store and handler wiring from [`AppConfig`].

use std::sync::Arc;

use ai_handlers::ChatHandler;
use anyhow::{Context as _, Result};
use companion_core::{AppConfig, StoreType};
use llm_client::{mask_token, LlmClient, ResponsesClient};
use memory_core::KeyValueStore;
use memory_inmemory::InMemoryKvStore;
use memory_sqlite::SqliteKvStore;
use storage::{CharacterStore, ChatStore, SettingsStore};
use tracing::info;

/// The stores plus a chat handler sharing them.
pub struct App {
    pub characters: Arc<CharacterStore>,
    pub chats: Arc<ChatStore>,
    pub settings: Arc<SettingsStore>,
    pub handler: ChatHandler,
}

impl App {
    /// Opens the configured backend and seeds settings from `config`.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let kv: Arc<dyn KeyValueStore> = match config.store_type {
            StoreType::Sqlite => Arc::new(
                SqliteKvStore::connect(&config.database_url)
                    .await
                    .with_context(|| format!("Open SQLite store at {}", config.database_url))?,
            ),
            StoreType::Memory => Arc::new(InMemoryKvStore::new()),
        };
        info!(store_type = ?config.store_type, endpoint = %config.endpoint, "Store opened");
        let llm = Arc::new(ResponsesClient::with_endpoint(config.endpoint.clone()));
        Self::with_parts(kv, llm, config).await
    }

    pub async fn with_parts(
        kv: Arc<dyn KeyValueStore>,
        llm: Arc<dyn LlmClient>,
        config: &AppConfig,
    ) -> Result<Self> {
        let characters = Arc::new(CharacterStore::new(kv.clone()));
        let chats = Arc::new(ChatStore::new(kv.clone()));
        let settings = Arc::new(SettingsStore::new(kv));

        let seeded = settings
            .seed_from(Some(&config.api_key), Some(&config.model))
            .await
            .context("Seed settings from environment")?;
        info!(
            api_key = %mask_token(&seeded.api_key),
            model = %seeded.model_name,
            "Settings loaded"
        );

        let handler = ChatHandler::new(characters.clone(), chats.clone(), settings.clone(), llm);
        Ok(Self {
            characters,
            chats,
            settings,
            handler,
        })
    }
}
