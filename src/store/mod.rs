// src/store/mod.rs
// Local persistence: one JSON document per collection, each a flat ordered
// list under a fixed key name. Read-modify-write with no locking; the last
// writer's full snapshot wins. Acceptable only because the system has a
// single logical caller per process.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::error::GatewayError;

pub mod files;

pub use files::{FileStore, StoredFile};

/// Fixed collection key for editor file records.
pub const FILES_KEY: &str = "code_files";
/// Fixed collection key for conversation records.
pub const CONVERSATIONS_KEY: &str = "conversations";

/// A directory of JSON collections.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn collection_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Read a collection. A missing or unreadable document degrades to an
    /// empty list rather than failing the caller.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = self.collection_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => records,
                Err(e) => {
                    warn!("corrupt collection {:?}, treating as empty: {}", path, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        }
    }

    /// Replace a collection with the given snapshot.
    pub fn write<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), GatewayError> {
        let path = self.collection_path(key);
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| GatewayError::Store(std::io::Error::other(e)))?;
        fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_collection_reads_empty() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let records: Vec<String> = store.read("nothing_here");
        assert!(records.is_empty());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        store.write("things", &["a".to_string(), "b".to_string()]).unwrap();
        let records: Vec<String> = store.read("things");
        assert_eq!(records, vec!["a", "b"]);
    }

    #[test]
    fn corrupt_collection_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let records: Vec<String> = store.read("broken");
        assert!(records.is_empty());
    }

    #[test]
    fn last_writer_wins() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        store.write("k", &[1u32, 2, 3]).unwrap();
        store.write("k", &[9u32]).unwrap();
        let records: Vec<u32> = store.read("k");
        assert_eq!(records, vec![9]);
    }
}
