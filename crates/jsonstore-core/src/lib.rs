//! # jsonstore Core
//!
//! Core types and logic for the jsonstore document store: the JSON document
//! model, storage backends, the query/mutation engine and the reader/writer
//! gate that serializes access to the document.

#![warn(missing_docs)]

/// System constants
pub mod constants;

/// Type definitions for the document model and errors
pub mod types;

/// Storage backends and the concurrency-gated store
pub mod storage;

/// CRUD, filter and sort operations over a document
pub mod engine;

/// Configuration, application state and factory
pub mod core;

// Re-export commonly used items
pub use types::{Collection, Document, Record, RecordId};
pub use types::error::{Error, ErrorKind, Result, StoreError, StoreResult};
pub use storage::{DocumentStorage, JsonFileStorage, MemoryStorage, StorageImpl, Store};
pub use engine::SortOrder;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
