//! Character profiles.
//!
//! The list is seeded with the default characters the first time it is read empty.

use std::sync::Arc;

use memory_core::{default_characters, validate_character, CharacterProfile, KeyValueStore};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::records::{read_record, write_record, CHARACTERS_KEY};
use crate::StorageError;

pub struct CharacterStore {
    kv: Arc<dyn KeyValueStore>,
    lock: Mutex<()>,
}

impl CharacterStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            lock: Mutex::new(()),
        }
    }

    // Caller holds `lock`.
    async fn load(&self) -> Result<Vec<CharacterProfile>, StorageError> {
        let characters: Vec<CharacterProfile> = read_record(self.kv.as_ref(), CHARACTERS_KEY).await?;
        if !characters.is_empty() {
            return Ok(characters);
        }
        let defaults = default_characters();
        write_record(self.kv.as_ref(), CHARACTERS_KEY, &defaults).await?;
        info!(count = defaults.len(), "Seeded default characters");
        Ok(defaults)
    }

    /// All characters, seeding the defaults when none are stored.
    pub async fn list(&self) -> Result<Vec<CharacterProfile>, StorageError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<CharacterProfile>, StorageError> {
        Ok(self.list().await?.into_iter().find(|c| c.id == id))
    }

    /// Validates and appends `character`; an empty id becomes `character_<uuid>`. Returns the id.
    pub async fn add(&self, mut character: CharacterProfile) -> Result<String, StorageError> {
        let errors = validate_character(&character);
        if !errors.is_empty() {
            return Err(StorageError::InvalidCharacter(errors));
        }
        if character.id.trim().is_empty() {
            character.id = format!("character_{}", Uuid::new_v4());
        }

        let _guard = self.lock.lock().await;
        let mut characters = self.load().await?;
        let id = character.id.clone();
        characters.push(character);
        write_record(self.kv.as_ref(), CHARACTERS_KEY, &characters).await?;
        info!(character_id = %id, "Character added");
        Ok(id)
    }

    /// Applies `edit` to the character with `id`. The id itself cannot change.
    pub async fn update<F>(&self, id: &str, edit: F) -> Result<CharacterProfile, StorageError>
    where
        F: FnOnce(&mut CharacterProfile),
    {
        let _guard = self.lock.lock().await;
        let mut characters = self.load().await?;
        let character = characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StorageError::CharacterNotFound(id.to_string()))?;

        let mut edited = character.clone();
        edit(&mut edited);
        edited.id = id.to_string();
        let errors = validate_character(&edited);
        if !errors.is_empty() {
            return Err(StorageError::InvalidCharacter(errors));
        }
        *character = edited.clone();

        write_record(self.kv.as_ref(), CHARACTERS_KEY, &characters).await?;
        Ok(edited)
    }

    /// Removes the character with `id`. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().await;
        let mut characters = self.load().await?;
        let before = characters.len();
        characters.retain(|c| c.id != id);
        if characters.len() == before {
            return Ok(false);
        }
        write_record(self.kv.as_ref(), CHARACTERS_KEY, &characters).await?;
        info!(character_id = %id, "Character deleted");
        Ok(true)
    }
}
