use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Arc,
};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::model::GeneratedImage;

/// Key the history list is stored under.
pub const HISTORY_KEY: &str = "ai-generated-images";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// String key/value storage with local-storage semantics.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryError>;
    fn set_item(&mut self, key: &str, value: String) -> Result<(), HistoryError>;
    fn remove_item(&mut self, key: &str) -> Result<(), HistoryError>;
}

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), HistoryError> {
        self.items.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), HistoryError> {
        self.items.lock().remove(key);
        Ok(())
    }
}

/// Storage backed by one JSON object file mapping keys to string values.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, HistoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            _ => {
                warn!(path = %self.path.display(), "storage file unreadable, starting empty");
                Ok(Map::new())
            }
        }
    }

    fn write_entries(&self, entries: Map<String, Value>) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(
            &self.path,
            serde_json::to_string_pretty(&Value::Object(entries))?,
        )?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HistoryError> {
        Ok(self
            .read_entries()?
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), HistoryError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), Value::String(value));
        self.write_entries(entries)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), HistoryError> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(entries)?;
        }
        Ok(())
    }
}

/// Newest-first list of generations, mirrored to storage on every change.
#[derive(Debug)]
pub struct HistoryStore<S: Storage> {
    storage: S,
    images: Vec<GeneratedImage>,
}

impl<S: Storage> HistoryStore<S> {
    /// Restores the list from storage. Data that is not a JSON array is
    /// dropped and the stored key removed; malformed entries inside an
    /// array are skipped.
    pub fn load(mut storage: S) -> Result<Self, HistoryError> {
        let images = match storage.get_item(HISTORY_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(entries) => {
                    let total = entries.len();
                    let images: Vec<GeneratedImage> = entries
                        .into_iter()
                        .filter_map(|entry| serde_json::from_value(entry).ok())
                        .collect();
                    if images.len() < total {
                        warn!(skipped = total - images.len(), "skipping malformed saved images");
                    }
                    images
                }
                Err(err) => {
                    warn!(%err, "error loading saved images, resetting history");
                    storage.remove_item(HISTORY_KEY)?;
                    Vec::new()
                }
            },
        };
        Ok(Self { storage, images })
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.id == id)
    }

    /// Prepends `image`, replacing any entry with the same id.
    pub fn add(&mut self, image: GeneratedImage) -> Result<(), HistoryError> {
        self.images.retain(|existing| existing.id != image.id);
        self.images.insert(0, image);
        self.persist()
    }

    /// Returns whether an entry was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, HistoryError> {
        let before = self.images.len();
        self.images.retain(|image| image.id != id);
        if self.images.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.images.clear();
        self.storage.remove_item(HISTORY_KEY)
    }

    fn persist(&mut self) -> Result<(), HistoryError> {
        let encoded = serde_json::to_string(&self.images)?;
        self.storage.set_item(HISTORY_KEY, encoded)
    }
}
