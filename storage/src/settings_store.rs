//! Credentials and model selection.

use std::sync::Arc;

use memory_core::{KeyValueStore, Settings};
use tokio::sync::Mutex;
use tracing::info;

use crate::records::{read_record, write_record, SETTINGS_KEY};
use crate::StorageError;

pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            lock: Mutex::new(()),
        }
    }

    /// Stored settings; the default model is used when the record names none.
    pub async fn get(&self) -> Result<Settings, StorageError> {
        let mut settings: Settings = read_record(self.kv.as_ref(), SETTINGS_KEY).await?;
        if settings.model_name.trim().is_empty() {
            settings.model_name = Settings::default().model_name;
        }
        Ok(settings)
    }

    async fn modify(&self, edit: impl FnOnce(&mut Settings)) -> Result<Settings, StorageError> {
        let _guard = self.lock.lock().await;
        let mut settings = self.get().await?;
        edit(&mut settings);
        write_record(self.kv.as_ref(), SETTINGS_KEY, &settings).await?;
        Ok(settings)
    }

    pub async fn set_api_key(&self, api_key: &str) -> Result<Settings, StorageError> {
        info!("API key updated");
        self.modify(|s| s.api_key = api_key.trim().to_string()).await
    }

    pub async fn set_model_name(&self, model_name: &str) -> Result<Settings, StorageError> {
        info!(model = %model_name, "Model updated");
        self.modify(|s| s.model_name = model_name.trim().to_string()).await
    }

    /// Fills an empty stored API key from `api_key`; a configured model replaces the default model.
    pub async fn seed_from(
        &self,
        api_key: Option<&str>,
        model_name: Option<&str>,
    ) -> Result<Settings, StorageError> {
        self.modify(|s| {
            if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
                if !s.has_api_key() {
                    s.api_key = key.to_string();
                }
            }
            if let Some(model) = model_name.map(str::trim).filter(|m| !m.is_empty()) {
                if s.model_name == Settings::default().model_name {
                    s.model_name = model.to_string();
                }
            }
        })
        .await
    }
}
