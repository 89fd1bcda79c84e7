//! Document model
//!
//! A [`Document`] maps collection names to [`Collection`]s; a collection holds
//! its records in insertion order together with the next identifier to hand
//! out. Serializes to the backing file format:
//!
//! ```text
//! { "<name>": { "_auto_increment": 3, "_data": [ {"id": 1, ...}, {"id": 2, ...} ] } }
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{FIRST_ID, ID};
use crate::types::error::{StoreError, StoreResult};
use crate::types::RecordId;

/// One stored object. Always carries an integer `id`.
pub type Record = Map<String, Value>;

/// Read the identifier of a record, if it has a valid one
pub fn record_id(record: &Record) -> Option<RecordId> {
    record.get(ID).and_then(Value::as_u64)
}

/// Named group of records sharing an auto-increment counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Identifier assigned to the next created record
    #[serde(rename = "_auto_increment")]
    pub next_id: RecordId,

    /// Records in insertion order
    #[serde(rename = "_data")]
    pub records: Vec<Record>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            next_id: FIRST_ID,
            records: Vec::new(),
        }
    }

    /// Index of the first record with the given id
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record_id(record) == Some(id))
    }

    /// First record with the given id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn validate(&self, name: &str) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for (index, record) in self.records.iter().enumerate() {
            let id = record_id(record).ok_or_else(|| {
                StoreError::load_failure(format!(
                    "record {} of collection '{}' has no integer id",
                    index, name
                ))
            })?;
            if !seen.insert(id) {
                return Err(StoreError::load_failure(format!(
                    "duplicate id {} in collection '{}'",
                    id, name
                )));
            }
            if id >= self.next_id {
                return Err(StoreError::load_failure(format!(
                    "id {} in collection '{}' is not below its auto increment {}",
                    id, name, self.next_id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole store: collection name to collection, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    collections: IndexMap<String, Collection>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from its JSON text and validate it
    pub fn from_json(text: &str) -> StoreResult<Self> {
        let document: Document = serde_json::from_str(text)
            .map_err(|e| StoreError::load_failure(format!("invalid store JSON: {}", e)))?;
        document.validate()?;
        Ok(document)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::persist_failure(format!("failed to serialize store: {}", e)))
    }

    /// Look up a collection
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Look up a collection for mutation
    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    /// Look up a collection, creating an empty one when absent
    pub fn collection_or_create(&mut self, name: &str) -> &mut Collection {
        self.collections.entry(name.to_string()).or_default()
    }

    /// Insert or replace a whole collection
    pub fn insert_collection(&mut self, name: impl Into<String>, collection: Collection) {
        self.collections.insert(name.into(), collection);
    }

    /// Number of collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the document holds no collections
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Check identifier invariants of every collection.
    ///
    /// Each record needs a non-negative integer `id`, unique within its
    /// collection and strictly below the collection's auto increment.
    pub fn validate(&self) -> StoreResult<()> {
        self.collections
            .iter()
            .try_for_each(|(name, collection)| collection.validate(name))
    }
}
