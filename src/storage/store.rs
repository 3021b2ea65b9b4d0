// src/storage/store.rs
//! Durable key-value storage seam.
//!
//! The verification subsystem persists two logical records under fixed
//! names, both holding UTF-8 JSON text. This module defines the storage
//! contract and two implementations:
//! - [`FileStore`]: one file per key inside a storage directory, scoped to
//!   the local installation the way browser storage is scoped to an origin
//! - [`MemoryStore`]: ephemeral map, used for tests and throwaway sessions
//!
//! Every write is a single atomic key write; there are no transactions.

use crate::error::VerifyError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Contract for origin-scoped durable storage of named UTF-8 records.
pub trait KeyValueStore: Send + Sync {
    /// Reads the record stored under `key`, `None` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, VerifyError>;

    /// Writes (or overwrites) the record stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), VerifyError>;

    /// Removes the record stored under `key`; removing an absent record is
    /// a no-op.
    fn remove(&self, key: &str) -> Result<(), VerifyError>;
}

/// File-backed store keeping one `<key>.json` file per record.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns `VerifyError::Storage` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, VerifyError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, VerifyError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), VerifyError> {
        Ok(fs::write(self.path_for(key), value)?)
    }

    fn remove(&self, key: &str) -> Result<(), VerifyError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store with the same contract, nothing survives the process.
#[allow(dead_code)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, VerifyError> {
        let entries = self.entries.lock().expect("store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), VerifyError> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), VerifyError> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.remove(key);
        Ok(())
    }
}
