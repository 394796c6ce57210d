//! In-memory document store.

use super::{BoxFuture, DocumentStore, StorageError, StorageResult, new_document_id, validate_draft};
use crate::document::{DocumentDraft, DocumentPage, ListFilter, MarkupDocument};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, MarkupDocument>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl DocumentStore for MemoryStore {
    fn create(&self, draft: DocumentDraft) -> BoxFuture<'_, StorageResult<MarkupDocument>> {
        Box::pin(async move {
            validate_draft(&draft)?;
            let now = Utc::now();
            let doc = MarkupDocument::from_draft(new_document_id(), draft, now, now);
            let mut docs = self.documents.write().map_err(lock_error)?;
            if let Some(id) = doc.id.clone() {
                docs.insert(id, doc.clone());
            }
            Ok(doc)
        })
    }

    fn update(&self, id: &str, draft: DocumentDraft) -> BoxFuture<'_, StorageResult<MarkupDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            validate_draft(&draft)?;
            let mut docs = self.documents.write().map_err(lock_error)?;
            let existing = docs
                .get(&id)
                .ok_or_else(|| StorageError::NotFound(id.clone()))?;
            let now = Utc::now();
            let created_at = existing.created_at.unwrap_or(now);
            let doc = MarkupDocument::from_draft(id.clone(), draft, created_at, now);
            docs.insert(id, doc.clone());
            Ok(doc)
        })
    }

    fn fetch_one(&self, id: &str) -> BoxFuture<'_, StorageResult<MarkupDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            docs.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn fetch_many(&self, filter: &ListFilter) -> BoxFuture<'_, StorageResult<DocumentPage>> {
        let filter = filter.clone();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            let summaries = docs
                .values()
                .filter(|doc| filter.matches(doc))
                .map(MarkupDocument::summary)
                .collect();
            Ok(filter.paginate(summaries))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.remove(&id).map(|_| ()).ok_or(StorageError::NotFound(id))
        })
    }
}
