//! Local key-value collaborator.
//!
//! Stand-in for the device's key-value storage: string keys, string values,
//! no schema. [`MemoryKv`] backs tests and ephemeral sessions; [`FileKv`]
//! persists the whole map to a single JSON file on every write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by the key-value collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String-keyed blob storage, the only persistence surface the stores use.
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory key-value store.
#[derive(Default)]
pub struct MemoryKv {
    cells: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cells.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a single JSON object in one file.
pub struct FileKv {
    path: PathBuf,
    cells: Mutex<HashMap<String, String>>,
}

impl FileKv {
    /// Opens the store, loading existing contents if the file is present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let cells = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|e| StorageError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            cells: Mutex::new(cells),
        })
    }

    fn flush(&self, cells: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(cells)?;
        std::fs::write(&self.path, raw).map_err(|e| StorageError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cells.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.insert(key.to_owned(), value.to_owned());
        self.flush(&cells)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.remove(key);
        self.flush(&cells)
    }
}
