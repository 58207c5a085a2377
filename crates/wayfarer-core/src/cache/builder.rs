//! Builder for creating and configuring ItineraryCache instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use super::ItineraryCache;
use crate::{
    config::CacheConfig,
    error::{Result, WayfarerError},
    remote::{HttpApi, ItineraryApi},
    storage::{KeyValueStore, SqliteStore},
};

/// Builder for creating and configuring ItineraryCache instances.
pub struct ItineraryCacheBuilder {
    database_path: Option<PathBuf>,
    config: CacheConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    api: Option<Arc<dyn ItineraryApi>>,
}

impl ItineraryCacheBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            config: CacheConfig::default(),
            store: None,
            api: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/wayfarer/wayfarer.db` or
    /// `~/.local/share/wayfarer/wayfarer.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the API URL, token and timings.
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `store` instead of opening a SQLite database.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses `api` instead of the reqwest client built from the config.
    pub fn with_api(mut self, api: Arc<dyn ItineraryApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Builds the configured cache instance.
    ///
    /// # Errors
    ///
    /// Returns `WayfarerError::FileSystem` if the database path is invalid
    /// Returns `WayfarerError::Database` if database initialization fails
    /// Returns `WayfarerError::Network` if the HTTP client cannot be created
    pub async fn build(self) -> Result<ItineraryCache> {
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };
                debug!("Opening cache database at {}", db_path.display());
                Arc::new(SqliteStore::open(db_path).await?)
            }
        };

        let api: Arc<dyn ItineraryApi> = match self.api {
            Some(api) => api,
            None => Arc::new(HttpApi::new(&self.config)?),
        };

        Ok(ItineraryCache::new(api, store, &self.config))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("wayfarer")
            .place_data_file("wayfarer.db")
            .map_err(|e| WayfarerError::XdgDirectory(e.to_string()))
    }
}

impl Default for ItineraryCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
