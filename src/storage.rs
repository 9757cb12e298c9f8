//! # Key-Value Storage
//!
//! The quota, premium and favorites stores all persist through a small
//! string-to-string key-value interface, the same shape as a browser's local
//! storage. Two implementations are provided: [`MemoryStore`] for tests and
//! short-lived sessions, and [`FileStore`], which keeps the whole key space in
//! one JSON object on disk.

use crate::storage_errors::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Logical storage keys shared by the stores
pub mod keys {
    pub const SEARCH_COUNT: &str = "search-count";
    pub const SEARCH_COUNT_DATE: &str = "search-count-date";
    pub const PREMIUM_STATUS: &str = "premium-status";
    pub const SUBSCRIPTION_ID: &str = "subscription-id";
    pub const SUBSCRIPTION_PERIOD: &str = "subscription-period";
    pub const FAVORITE_RECIPES: &str = "favorite-recipes";
}

/// String key-value store scoped to one application
///
/// Writes are last-write-wins; there is no cross-process locking.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key; absent keys are ignored
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key
    fn clear(&self) -> Result<(), StorageError>;
}

/// Read a JSON value stored under `key`
///
/// Malformed JSON is logged and reported as absent, so callers fall back to
/// their default state.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring malformed JSON stored under '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Serialize `value` as JSON under `key`
pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

fn lock<'a>(
    entries: &'a Mutex<BTreeMap<String, String>>,
) -> Result<MutexGuard<'a, BTreeMap<String, String>>, StorageError> {
    entries
        .lock()
        .map_err(|e| StorageError::Poisoned(e.to_string()))
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries)?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        lock(&self.entries)?.clear();
        Ok(())
    }
}

/// Store persisted as a single JSON object file
///
/// The file is read once on open and rewritten after every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist
    ///
    /// A file that is not a JSON object of strings is logged and ignored; it
    /// is overwritten by the next change.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        info!("Opening key-value store at {}", path.display());

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(
                            "Ignoring malformed store file {}: {}",
                            path.display(),
                            e
                        );
                        BTreeMap::new()
                    }
                }
            }
        } else {
            debug!("Store file {} does not exist yet", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        debug!("Persisted {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries)?;
        entries.clear();
        self.persist(&entries)
    }
}
