//! Store - the concurrency gate around the in-memory document
//!
//! One reader/writer lock guards the document. Reads share it; writes and
//! reloads hold it exclusively. A write runs against a staged copy of the
//! document, persists that copy, and only then swaps it in, so a failed
//! persist never leaves memory ahead of disk.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::engine::{self, SortOrder};
use crate::storage::StorageImpl;
use crate::types::{Document, Record, RecordId, StoreResult};

/// In-memory document plus the backend it is persisted to
pub struct Store<S: StorageImpl> {
    document: RwLock<Document>,
    storage: S,
}

impl<S: StorageImpl> Store<S> {
    /// Load the document from `storage` and wrap it
    pub fn open(storage: S) -> StoreResult<Self> {
        let document = storage.load()?;
        info!(
            "Opened store from {} with {} collections",
            storage.describe(),
            document.len()
        );
        Ok(Self::with_document(storage, document))
    }

    /// Wrap an already loaded document
    pub fn with_document(storage: S, document: Document) -> Self {
        Self {
            document: RwLock::new(document),
            storage,
        }
    }

    /// Backend the store persists to
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Copy of the current in-memory document
    pub fn snapshot(&self) -> Document {
        self.document.read().clone()
    }

    /// Number of collections currently held
    pub fn collection_count(&self) -> usize {
        self.document.read().len()
    }

    /// Replace the in-memory document with a fresh load from the backend.
    ///
    /// Holds the write lock for the whole swap. On failure the previous
    /// document stays in place.
    pub fn reload(&self) -> StoreResult<()> {
        let mut document = self.document.write();
        match self.storage.load() {
            Ok(fresh) => {
                *document = fresh;
                info!("Reloaded store from {}", self.storage.describe());
                Ok(())
            }
            Err(e) => {
                warn!("Reload from {} failed: {}", self.storage.describe(), e);
                Err(e)
            }
        }
    }

    /// All records of `collection`
    pub fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        debug!("list {}", collection);
        let document = self.document.read();
        engine::list(&document, collection).map(<[Record]>::to_vec)
    }

    /// Records of `collection` matching every field in `params`
    pub fn list_filtered(
        &self,
        collection: &str,
        params: &HashMap<String, String>,
    ) -> StoreResult<Vec<Record>> {
        debug!("list {} filtered by {:?}", collection, params);
        let document = self.document.read();
        engine::list_filtered(&document, collection, params).map(owned)
    }

    /// Records of `collection` sorted by `field`
    pub fn list_sorted(
        &self,
        collection: &str,
        field: &str,
        order: SortOrder,
    ) -> StoreResult<Vec<Record>> {
        debug!("list {} sorted by {} {:?}", collection, field, order);
        let document = self.document.read();
        engine::list_sorted(&document, collection, field, order).map(owned)
    }

    /// Record `id` of `collection`
    pub fn get_by_id(&self, collection: &str, id: RecordId) -> StoreResult<Record> {
        debug!("get {}/{}", collection, id);
        let document = self.document.read();
        engine::get_by_id(&document, collection, id).cloned()
    }

    /// Append a record with the next id, creating the collection if needed
    pub fn create(&self, collection: &str, body: Record) -> StoreResult<Record> {
        debug!("create in {}", collection);
        self.mutate(|document| engine::create(document, collection, body))
    }

    /// Replace record `id` wholesale, or append it
    pub fn create_or_replace(
        &self,
        collection: &str,
        id: RecordId,
        body: Record,
    ) -> StoreResult<Record> {
        debug!("replace {}/{}", collection, id);
        self.mutate(|document| engine::create_or_replace(document, collection, id, body))
    }

    /// Merge known fields into record `id`
    pub fn update(&self, collection: &str, id: RecordId, body: Record) -> StoreResult<Record> {
        debug!("update {}/{}", collection, id);
        self.mutate(|document| engine::update(document, collection, id, body))
    }

    /// Remove record `id` and return it
    pub fn delete(&self, collection: &str, id: RecordId) -> StoreResult<Record> {
        debug!("delete {}/{}", collection, id);
        self.mutate(|document| engine::delete(document, collection, id))
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut Document) -> StoreResult<T>) -> StoreResult<T> {
        let mut document = self.document.write();
        let mut staged = document.clone();
        let outcome = op(&mut staged)?;
        if let Err(e) = self.storage.persist(&staged) {
            warn!("Mutation discarded, persist to {} failed: {}", self.storage.describe(), e);
            return Err(e);
        }
        *document = staged;
        Ok(outcome)
    }
}

fn owned(records: Vec<&Record>) -> Vec<Record> {
    records.into_iter().cloned().collect()
}
