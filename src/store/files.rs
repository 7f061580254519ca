// src/store/files.rs
// Editor file records over the local store. Update always refreshes
// updated_at; the UI lists newest-updated first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LocalStore, FILES_KEY};
use crate::error::GatewayError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
    pub language: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct FilePatch {
    pub name: Option<String>,
    pub language: Option<String>,
    pub content: Option<String>,
}

/// CRUD over the `code_files` collection.
#[derive(Debug, Clone)]
pub struct FileStore {
    store: LocalStore,
}

impl FileStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// List files. `"-updated"` sorts newest-updated first; anything else
    /// returns insertion order.
    pub fn list(&self, sort: Option<&str>) -> Vec<StoredFile> {
        let mut files: Vec<StoredFile> = self.store.read(FILES_KEY);
        if sort == Some("-updated") {
            files.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        }
        files
    }

    pub fn get(&self, id: &str) -> Option<StoredFile> {
        self.store
            .read::<StoredFile>(FILES_KEY)
            .into_iter()
            .find(|f| f.id == id)
    }

    pub fn create(
        &self,
        name: impl Into<String>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<StoredFile, GatewayError> {
        let now = Utc::now();
        let file = StoredFile {
            id: format!("file_{}", Uuid::new_v4()),
            name: name.into(),
            language: language.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        };

        let mut files: Vec<StoredFile> = self.store.read(FILES_KEY);
        files.push(file.clone());
        self.store.write(FILES_KEY, &files)?;
        Ok(file)
    }

    pub fn update(&self, id: &str, patch: FilePatch) -> Result<StoredFile, GatewayError> {
        let mut files: Vec<StoredFile> = self.store.read(FILES_KEY);
        let file = files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;

        if let Some(name) = patch.name {
            file.name = name;
        }
        if let Some(language) = patch.language {
            file.language = language;
        }
        if let Some(content) = patch.content {
            file.content = content;
        }
        file.updated_at = Utc::now();

        let updated = file.clone();
        self.store.write(FILES_KEY, &files)?;
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let mut files: Vec<StoredFile> = self.store.read(FILES_KEY);
        files.retain(|f| f.id != id);
        self.store.write(FILES_KEY, &files)
    }
}
