//! Storage layer for jsonstore
//!
//! A [`DocumentStorage`] backend knows how to load a whole [`Document`] and
//! persist it again. [`Store`] owns the in-memory document, guards it with a
//! reader/writer lock and persists through its backend after every mutation.

use crate::types::{Document, StoreResult};

/// Trait for document storage backends
pub trait DocumentStorage: Send + Sync {
    /// Read the full document from the backend
    fn load(&self) -> StoreResult<Document>;

    /// Overwrite the backend with the full document
    fn persist(&self, document: &Document) -> StoreResult<()>;

    /// Human-readable description for logs and the info endpoint
    fn describe(&self) -> String;
}

/// Backing JSON file
pub mod file;

/// Ephemeral in-memory backend
pub mod memory;

/// Concurrency-gated store
pub mod store;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use store::Store;

/// Helper trait that combines all requirements for storage implementations
/// This cleans up generic bounds throughout the codebase
pub trait StorageImpl: DocumentStorage + 'static {}

/// Blanket implementation for any type that meets the requirements
impl<T> StorageImpl for T where T: DocumentStorage + 'static {}
