//! File-based document store.

use super::{BoxFuture, DocumentStore, StorageError, StorageResult, new_document_id, validate_draft};
use crate::document::{DocumentDraft, DocumentPage, ListFilter, MarkupDocument};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based document store.
///
/// Stores each document as a JSON file in a base directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location.
    ///
    /// On Linux: `~/.local/share/sitemark/documents/`
    /// On Windows: `%LOCALAPPDATA%\sitemark\documents\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("sitemark").join("documents"))
    }

    /// Get the file path for a document id.
    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn write(&self, doc: &MarkupDocument) -> StorageResult<()> {
        let id = doc
            .id
            .as_deref()
            .ok_or_else(|| StorageError::Invalid("document has no id".to_string()))?;
        let path = self.document_path(id);
        let json = doc
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn read(&self, id: &str) -> StorageResult<MarkupDocument> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        read_document(&path)
    }

    fn read_all(&self) -> StorageResult<Vec<MarkupDocument>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut docs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match read_document(&path) {
                Ok(doc) => docs.push(doc),
                Err(e) => log::warn!("Skipping unreadable document: {}", e),
            }
        }
        Ok(docs)
    }
}

fn read_document(path: &Path) -> StorageResult<MarkupDocument> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    MarkupDocument::from_json(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

impl DocumentStore for FileStore {
    fn create(&self, draft: DocumentDraft) -> BoxFuture<'_, StorageResult<MarkupDocument>> {
        Box::pin(async move {
            validate_draft(&draft)?;
            let now = Utc::now();
            let doc = MarkupDocument::from_draft(new_document_id(), draft, now, now);
            self.write(&doc)?;
            log::debug!("Created document {:?} in {}", doc.id, self.base_path.display());
            Ok(doc)
        })
    }

    fn update(&self, id: &str, draft: DocumentDraft) -> BoxFuture<'_, StorageResult<MarkupDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            validate_draft(&draft)?;
            let existing = self.read(&id)?;
            let now = Utc::now();
            let created_at = existing.created_at.unwrap_or(now);
            let doc = MarkupDocument::from_draft(id, draft, created_at, now);
            self.write(&doc)?;
            Ok(doc)
        })
    }

    fn fetch_one(&self, id: &str) -> BoxFuture<'_, StorageResult<MarkupDocument>> {
        let id = id.to_string();
        Box::pin(async move { self.read(&id) })
    }

    fn fetch_many(&self, filter: &ListFilter) -> BoxFuture<'_, StorageResult<DocumentPage>> {
        let filter = filter.clone();
        Box::pin(async move {
            let summaries = self
                .read_all()?
                .iter()
                .filter(|doc| filter.matches(doc))
                .map(MarkupDocument::summary)
                .collect();
            Ok(filter.paginate(summaries))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })
        })
    }
}
