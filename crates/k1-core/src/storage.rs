use std::{collections::BTreeMap, sync::RwLock};

use serde::{de::DeserializeOwned, Serialize};

use crate::CoreError;

/// Level records `{id, title, description, difficulty, completed, locked}`.
pub const GAME_PROGRESS_KEY: &str = "gameProgress";
/// Map of quiz id to `{score, totalQuestions, date}`.
pub const QUIZ_RESULTS_KEY: &str = "quizResults";
/// Array of saved worksheet names, in save order.
pub const WORKSHEET_NAMES_KEY: &str = "basisWorksheetNames";
pub const WORKSHEET_KEY_PREFIX: &str = "basisWorksheet_";

pub fn worksheet_key(name: &str) -> String {
    format!("{WORKSHEET_KEY_PREFIX}{name}")
}

/// String-keyed blob storage backing every persisted record.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
    fn keys(&self) -> Result<Vec<String>, CoreError>;
}

/// Volatile store used by tests and by hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

/// Reads and decodes a JSON record. A blob that does not match `T` is reported
/// as [`CoreError::CorruptRecord`].
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, CoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| CoreError::CorruptRecord {
            key: key.to_string(),
            reason: err.to_string(),
        })
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), CoreError> {
    let raw = serde_json::to_string(value).map_err(|err| CoreError::Serde(err.to_string()))?;
    store.set(key, &raw)
}
