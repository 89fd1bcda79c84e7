//! Application Factory
//!
//! This module provides factory functions for creating and initializing the
//! AppState with the storage backend selected by configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::core::app_state::AppState;
use crate::core::config::{Config, StorageType};
use crate::storage::{JsonFileStorage, MemoryStorage, Store};
use crate::types::StoreError;

/// AppState factory errors
#[derive(Error, Debug)]
pub enum AppStateFactoryError {
    /// The backing file does not exist and may not be created
    #[error("Store file {0} does not exist and create_if_missing is disabled")]
    MissingStoreFile(PathBuf),

    /// Storage initialization failed
    #[error("Storage initialization failed: {0}")]
    StorageInitializationFailed(#[from] StoreError),
}

/// AppState for each storage backend
pub enum ConfiguredAppState {
    /// Backed by a JSON file
    File {
        /// The application state with file storage
        app_state: AppState<JsonFileStorage>,
    },
    /// Backed by process memory
    Memory {
        /// The application state with memory storage
        app_state: AppState<MemoryStorage>,
    },
}

impl ConfiguredAppState {
    /// Configuration the state was built from
    pub fn config(&self) -> &Config {
        match self {
            ConfiguredAppState::File { app_state } => &app_state.config,
            ConfiguredAppState::Memory { app_state } => &app_state.config,
        }
    }

    /// Get the HTTP address from config
    pub fn http_addr(&self) -> SocketAddr {
        self.config().server.http_addr
    }
}

/// Create AppState based on configuration
pub fn create_app_state(config: Config) -> Result<ConfiguredAppState, AppStateFactoryError> {
    info!("Creating AppState with storage type: {}", config.storage.storage_type);

    match config.storage.storage_type {
        StorageType::File => {
            let storage = JsonFileStorage::new(&config.storage.path);
            if !storage.exists() {
                if !config.storage.create_if_missing {
                    return Err(AppStateFactoryError::MissingStoreFile(
                        config.storage.path.clone(),
                    ));
                }
                storage.ensure_exists()?;
            }
            let store = Arc::new(Store::open(storage)?);
            Ok(ConfiguredAppState::File {
                app_state: AppState::new(store, config),
            })
        }
        StorageType::Memory => {
            let store = Arc::new(Store::open(MemoryStorage::new())?);
            Ok(ConfiguredAppState::Memory {
                app_state: AppState::new(store, config),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn file_config(path: PathBuf) -> Config {
        let mut config = Config::default();
        config.storage.path = path;
        config
    }

    #[test]
    fn file_backend_creates_missing_store() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        let state = create_app_state(file_config(path.clone())).unwrap();

        assert!(path.is_file());
        match state {
            ConfiguredAppState::File { app_state } => {
                assert_eq!(app_state.store.collection_count(), 0);
            }
            ConfiguredAppState::Memory { .. } => panic!("expected file backend"),
        }
    }

    #[test]
    fn file_backend_loads_existing_store() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, r#"{"a":{"_auto_increment":1,"_data":[]},"b":{"_auto_increment":1,"_data":[]}}"#)
            .unwrap();
        match create_app_state(file_config(path)).unwrap() {
            ConfiguredAppState::File { app_state } => {
                assert_eq!(app_state.store.collection_count(), 2);
            }
            ConfiguredAppState::Memory { .. } => panic!("expected file backend"),
        }
    }

    #[test]
    fn missing_store_without_create_fails() {
        let temp = tempdir().unwrap();
        let mut config = file_config(temp.path().join("store.json"));
        config.storage.create_if_missing = false;
        assert!(matches!(
            create_app_state(config),
            Err(AppStateFactoryError::MissingStoreFile(_))
        ));
    }

    #[test]
    fn corrupt_store_fails_startup() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            create_app_state(file_config(path)),
            Err(AppStateFactoryError::StorageInitializationFailed(StoreError::LoadFailure(_)))
        ));
    }

    #[test]
    fn memory_backend_starts_empty() {
        let mut config = Config::default();
        config.storage.storage_type = StorageType::Memory;
        let state = create_app_state(config).unwrap();
        assert_eq!(state.config().storage.storage_type, StorageType::Memory);
        assert!(matches!(state, ConfiguredAppState::Memory { .. }));
    }
}
