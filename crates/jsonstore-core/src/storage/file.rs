//! JSON file backend
//!
//! The whole document lives in one pretty-printed JSON file. Persisting
//! writes a sibling temporary file, syncs it and renames it over the
//! original, so readers of the file never see a half-written store.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::storage::DocumentStorage;
use crate::types::{Document, StoreError, StoreResult};

const TEMP_SUFFIX: &str = ".tmp";

/// Document storage backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a backend for the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write an empty document when the backing file does not exist yet,
    /// creating missing parent directories.
    pub fn ensure_exists(&self) -> StoreResult<()> {
        if self.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::persist_failure(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        info!("Creating empty store at {}", self.path.display());
        self.persist(&Document::new())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(TEMP_SUFFIX);
        PathBuf::from(name)
    }

    fn write_atomically(&self, bytes: &[u8]) -> io::Result<()> {
        let temp_path = self.temp_path();

        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)
    }
}

impl DocumentStorage for JsonFileStorage {
    fn load(&self) -> StoreResult<Document> {
        debug!("Loading store from {}", self.path.display());
        let text = fs::read_to_string(&self.path).map_err(|e| {
            StoreError::load_failure(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        Document::from_json(&text)
    }

    fn persist(&self, document: &Document) -> StoreResult<()> {
        let mut text = document.to_json_pretty()?;
        text.push('\n');
        self.write_atomically(text.as_bytes()).map_err(|e| {
            StoreError::persist_failure(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        debug!("Persisted {} collections to {}", document.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[test]
    fn ensure_exists_writes_empty_document() {
        let temp = tempdir().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("nested").join("store.json"));
        assert!(!storage.exists());

        storage.ensure_exists().unwrap();
        assert!(storage.exists());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn ensure_exists_keeps_existing_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, r#"{"t":{"_auto_increment":2,"_data":[{"id":1}]}}"#).unwrap();
        let storage = JsonFileStorage::new(&path);

        storage.ensure_exists().unwrap();
        assert_eq!(storage.load().unwrap().collection("t").unwrap().len(), 1);
    }

    #[test]
    fn persist_then_load_round_trip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        let original = r#"{
            "users": {"_auto_increment": 3, "_data": [{"id": 1, "name": "Al"}, {"id": 2, "tags": ["a"]}]},
            "empty": {"_auto_increment": 1, "_data": []}
        }"#;
        fs::write(&path, original).unwrap();
        let storage = JsonFileStorage::new(&path);

        storage.persist(&storage.load().unwrap()).unwrap();

        let before: Value = serde_json::from_str(original).unwrap();
        let after: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn persist_is_pretty_printed_and_leaves_no_temp_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        let storage = JsonFileStorage::new(&path);
        let document: Document =
            serde_json::from_value(json!({"t": {"_auto_increment": 2, "_data": [{"id": 1}]}})).unwrap();

        storage.persist(&document).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"t\": {"));
        assert!(text.contains("\"_auto_increment\": 2"));
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn load_missing_file_is_load_failure() {
        let temp = tempdir().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("absent.json"));
        assert!(matches!(storage.load(), Err(StoreError::LoadFailure(_))));
    }

    #[test]
    fn load_corrupt_file_is_load_failure() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.load(), Err(StoreError::LoadFailure(_))));
    }

    #[test]
    fn persist_into_missing_directory_is_persist_failure() {
        let temp = tempdir().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("gone").join("store.json"));
        assert!(matches!(
            storage.persist(&Document::new()),
            Err(StoreError::PersistFailure(_))
        ));
    }
}
