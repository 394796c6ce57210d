//! Document store abstraction for persistence.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::document::{DocumentDraft, DocumentPage, ListFilter, MarkupDocument};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid document: {0}")]
    Invalid(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for markup document stores.
///
/// Implementations assign ids and timestamps; callers only ever send
/// drafts. The same stores back the editor and the HTTP server, so
/// futures must be `Send`.
pub trait DocumentStore: Send + Sync {
    /// Persist a new document and return it with its assigned id.
    fn create(&self, draft: DocumentDraft) -> BoxFuture<'_, StorageResult<MarkupDocument>>;

    /// Replace an existing document, keeping its creation time.
    fn update(&self, id: &str, draft: DocumentDraft) -> BoxFuture<'_, StorageResult<MarkupDocument>>;

    /// Load a single document.
    fn fetch_one(&self, id: &str) -> BoxFuture<'_, StorageResult<MarkupDocument>>;

    /// List document summaries matching a filter.
    fn fetch_many(&self, filter: &ListFilter) -> BoxFuture<'_, StorageResult<DocumentPage>>;

    /// Delete a document.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Generate a new document id.
pub fn new_document_id() -> String {
    format!("doc-{}", uuid::Uuid::new_v4())
}

/// Reject drafts a store should never accept.
pub fn validate_draft(draft: &DocumentDraft) -> StorageResult<()> {
    if draft.title.trim().is_empty() {
        return Err(StorageError::Invalid("title must not be empty".to_string()));
    }
    if draft.blueprint.url.trim().is_empty() {
        return Err(StorageError::Invalid("blueprintUrl must not be empty".to_string()));
    }
    Ok(())
}
