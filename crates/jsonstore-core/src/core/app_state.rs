//! Application State Management
//!
//! This module defines the central AppState that holds the store and the
//! configuration. It is built by the factory and shared by every request
//! handler.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::Config;
use crate::storage::{StorageImpl, Store};

/// Central application state
pub struct AppState<S: StorageImpl> {
    /// The one store of this process
    pub store: Arc<Store<S>>,

    /// Application configuration
    pub config: Config,

    /// When the state was created
    pub started_at: Instant,
}

// Manual Clone implementation for AppState that doesn't require S: Clone
// Since storage is held in an Arc, we only need to clone the Arc (increment reference count)
impl<S: StorageImpl> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            started_at: self.started_at,
        }
    }
}

impl<S: StorageImpl> AppState<S> {
    /// Create a new AppState around an opened store
    pub fn new(store: Arc<Store<S>>, config: Config) -> Self {
        Self {
            store,
            config,
            started_at: Instant::now(),
        }
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
