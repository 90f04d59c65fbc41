//! Key-value persistence for the reminder collection.
//!
//! Backends only know how to get and set named JSON values. `ReminderStore`
//! layers the reminder-specific policy on top: one fixed key, normalization
//! on load, and a fresh start when the stored value can't be read.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::reminders::ReminderCollection;

/// Key the reminder collection is stored under
pub const REMINDERS_KEY: &str = "reminders";

/// A synchronous named-value store
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    fn set(&self, key: &str, value: &Value) -> StoreResult<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let value = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "Loaded value");
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json)?;
        debug!(path = %path.display(), "Saved value");
        Ok(())
    }
}

/// Loads and saves the reminder collection through a [`Storage`] backend
pub struct ReminderStore {
    backend: Box<dyn Storage>,
}

impl ReminderStore {
    pub fn new(backend: Box<dyn Storage>) -> Self {
        Self { backend }
    }

    pub fn json(dir: &Path) -> Self {
        Self::new(Box::new(JsonFileStorage::new(dir)))
    }

    /// Stored collection, or an empty one when nothing usable is stored
    pub fn load(&self) -> ReminderCollection {
        let value = match self.backend.get(REMINDERS_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => return ReminderCollection::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored reminders, starting empty");
                return ReminderCollection::new();
            }
        };

        match serde_json::from_value::<ReminderCollection>(value) {
            Ok(collection) => {
                debug!(count = collection.len(), "Loaded reminders");
                collection
            }
            Err(e) => {
                warn!(error = %e, "Stored reminders are malformed, starting empty");
                ReminderCollection::new()
            }
        }
    }

    pub fn save(&self, reminders: &ReminderCollection) -> StoreResult<()> {
        let value = serde_json::to_value(reminders)?;
        self.backend.set(REMINDERS_KEY, &value)?;
        debug!(count = reminders.len(), "Saved reminders");
        Ok(())
    }

    /// Save `after` only when it differs from `before`
    pub fn persist_change(
        &self,
        before: &ReminderCollection,
        after: &ReminderCollection,
    ) -> StoreResult<bool> {
        if before == after {
            return Ok(false);
        }
        self.save(after)?;
        Ok(true)
    }
}
