//! Client-local key/value storage and the persisted revision marker.

use crate::error::BablicError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Storage entry holding the last "translations updated" revision.
pub const REVISION_KEY: &str = "bablic_ngx_last_update";

/// Browser-`localStorage`-like string store.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), BablicError>;
}

/// Volatile storage, lost with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BablicError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object in a single file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Store under `{data_dir}/local_storage.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("local_storage.json"))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> HashMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("storage: ignoring unreadable {}: {e}", self.path.display());
                HashMap::new()
            }
        }
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_all().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BablicError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_all();
        items.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BablicError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let content = serde_json::to_string_pretty(&items)?;
        std::fs::write(&self.path, content).map_err(|e| {
            BablicError::Storage(format!("failed to write {}: {e}", self.path.display()))
        })?;
        debug!("storage: wrote {key} to {}", self.path.display());
        Ok(())
    }
}

/// Last persisted revision marker, if any.
pub fn load_revision(storage: &dyn LocalStorage) -> Option<String> {
    storage.get_item(REVISION_KEY).filter(|r| !r.is_empty())
}

/// Overwrite the revision marker.
pub fn store_revision(storage: &dyn LocalStorage, revision: &str) -> Result<(), BablicError> {
    storage.set_item(REVISION_KEY, revision)
}
