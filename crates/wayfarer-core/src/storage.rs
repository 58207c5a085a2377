//! Durable key-value facility used by the snapshot store and the queue.
//!
//! Two implementations are provided: [`SqliteStore`], which persists values
//! across process restarts, and [`MemoryStore`], which keeps them for the
//! lifetime of the process only.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use tokio::task;

use crate::{
    db::Database,
    error::{Result, WayfarerError},
};

/// Key holding the last known list of itineraries.
pub const OFFLINE_ITINERARIES_KEY: &str = "wayfarer:offline_itineraries";

/// Key holding the queue of mutations awaiting replay.
pub const PENDING_SYNC_KEY: &str = "wayfarer:pending_sync";

/// Asynchronous string key-value storage with whole-value overwrite
/// semantics.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Deletes `key`; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite implementation of [`KeyValueStore`].
///
/// Every call opens its own connection on the blocking thread pool, so the
/// store can be shared freely between tasks.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (and if needed creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::FileSystem` if the parent directory cannot be
    /// created, or `WayfarerError::Database` if schema initialization fails.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WayfarerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), WayfarerError>(())
        })
        .await
        .map_err(WayfarerError::join)??;

        Ok(Self { db_path })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get(&key)
        })
        .await
        .map_err(WayfarerError::join)?
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set(&key, &value)
        })
        .await
        .map_err(WayfarerError::join)?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.remove(&key).map(|_| ())
        })
        .await
        .map_err(WayfarerError::join)?
    }
}

/// In-process implementation of [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values.lock().map_err(|_| WayfarerError::Configuration {
            message: "Memory store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
