//! Local key-value persistence
//!
//! A single JSON file under the data directory plays the role of the host
//! page's storage slot. All persistence here is best-effort: corrupt or
//! inaccessible storage degrades to defaults, never to a fault.

mod position;

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::warn;

pub use position::{PositionStore, POSITION_KEY};

/// Errors from the persistent store
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read stored value: {0}")]
    Read(String),

    #[error("failed to write stored value: {0}")]
    Write(String),
}

/// A persistent string-to-string slot store
pub trait KeyValueStore: Send {
    /// Fetch the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Key-value store backed by a single JSON object file
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the backing file into a JSON object, tolerating absence
    fn read_map(&self) -> Result<Map<String, Value>, PersistenceError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| PersistenceError::Read(e.to_string()))?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(PersistenceError::Read(format!(
                "expected object at {}, found {}",
                self.path.display(),
                other
            ))),
            Err(e) => Err(PersistenceError::Read(e.to_string())),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let map = self.read_map()?;
        match map.get(key) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(PersistenceError::Read(format!(
                "non-string value stored under {key}: {other}"
            ))),
            None => Ok(None),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        // A corrupt file must not block new writes; start over from empty.
        let mut map = self.read_map().unwrap_or_else(|e| {
            warn!(?e, "discarding unreadable store file");
            Map::new()
        });
        map.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PersistenceError::Write(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| PersistenceError::Write(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| PersistenceError::Write(e.to_string()))
    }
}

/// In-memory store for hosts without persistence and for tests
#[derive(Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
