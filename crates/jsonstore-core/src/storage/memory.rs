//! In-memory backend
//!
//! Keeps the last persisted document in process memory. Nothing survives a
//! restart; useful for throwaway mock servers and tests.

use parking_lot::Mutex;

use crate::storage::DocumentStorage;
use crate::types::{Document, StoreResult};

/// Document storage that never touches the disk
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Document>,
}

impl MemoryStorage {
    /// Create a backend holding an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the last persisted document
    pub fn snapshot(&self) -> Document {
        self.snapshot.lock().clone()
    }
}

impl DocumentStorage for MemoryStorage {
    fn load(&self) -> StoreResult<Document> {
        Ok(self.snapshot())
    }

    fn persist(&self, document: &Document) -> StoreResult<()> {
        *self.snapshot.lock() = document.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
