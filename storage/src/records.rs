//! Record keys and JSON read/write helpers.

use memory_core::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::StorageError;

pub const CHARACTERS_KEY: &str = "companion_characters";
pub const CHAT_HISTORY_KEY: &str = "companion_chat_history";
pub const EMOTIONAL_CONTEXT_KEY: &str = "companion_emotional_context";
pub const SETTINGS_KEY: &str = "companion_settings";

/// Reads and parses a record. Absent or malformed records yield `T::default()`.
pub async fn read_record<T>(kv: &dyn KeyValueStore, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = kv.get(key).await? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Malformed record, using default");
            Ok(T::default())
        }
    }
}

/// Serializes and stores a record, replacing the previous value.
pub async fn write_record<T>(kv: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    kv.set(key, raw).await?;
    Ok(())
}
