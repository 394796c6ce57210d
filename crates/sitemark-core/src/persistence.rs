//! Saving and opening documents through a [`DocumentStore`].

use crate::document::{DocumentDraft, DocumentLocation, DocumentPage, ListFilter, MarkupDocument};
use crate::editor::EditorState;
use crate::storage::{DocumentStore, StorageError, StorageResult};
use thiserror::Error;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Another save or open is in progress")]
    Busy,
    #[error("No blueprint loaded")]
    NoBlueprint,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What the save dialog collects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: DocumentLocation,
    pub site: Option<String>,
    /// Author recorded on the document. When unset, the author of the open
    /// document is kept.
    pub created_by: Option<String>,
}

impl SaveRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Clears a busy flag when dropped.
struct BusyFlag<'a>(&'a mut bool);

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

fn ensure_idle(state: &EditorState) -> Result<(), PersistenceError> {
    if state.is_saving || state.is_loading {
        return Err(PersistenceError::Busy);
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn build_draft(state: &EditorState, request: SaveRequest) -> Result<DocumentDraft, PersistenceError> {
    let blueprint = state.blueprint_ref().ok_or(PersistenceError::NoBlueprint)?;
    let created_by = non_blank(request.created_by)
        .or_else(|| state.current_file.as_ref().and_then(|f| f.created_by.clone()));
    Ok(DocumentDraft {
        title: request.title,
        description: non_blank(request.description),
        blueprint,
        markup_data: state.markup_objects.clone(),
        location: request.location,
        site: non_blank(request.site),
        created_by,
    })
}

/// A save whose store call has not completed yet.
#[derive(Debug, Clone)]
pub struct PendingSave {
    /// Id of the document being updated. None creates a new document.
    pub id: Option<String>,
    pub draft: DocumentDraft,
}

impl PendingSave {
    /// Send the draft to the store.
    pub async fn send(self, store: &dyn DocumentStore) -> StorageResult<MarkupDocument> {
        match &self.id {
            Some(id) => store.update(id, self.draft).await,
            None => store.create(self.draft).await,
        }
    }
}

/// Start a save: snapshot the markup into a draft and raise `is_saving`.
///
/// Hosts that keep the editor usable while the store call runs use this
/// with [`finish_save`]; a second save or open started in between fails
/// with [`PersistenceError::Busy`].
pub fn begin_save(state: &mut EditorState, request: SaveRequest) -> Result<PendingSave, PersistenceError> {
    ensure_idle(state)?;
    let draft = build_draft(state, request)?;
    let id = state.current_file.as_ref().and_then(|f| f.id.clone());
    state.is_saving = true;
    Ok(PendingSave { id, draft })
}

/// Complete a save started with [`begin_save`].
///
/// On success the stored document becomes `current_file`. On failure the
/// editor is left as it was. `is_saving` is cleared either way.
pub fn finish_save(
    state: &mut EditorState,
    result: StorageResult<MarkupDocument>,
) -> Result<MarkupDocument, PersistenceError> {
    state.is_saving = false;
    match result {
        Ok(document) => {
            log::info!("Saved document {:?} ({} objects)", document.id, document.markup_data.len());
            state.current_file = Some(document.clone());
            state.dialogs.save = false;
            Ok(document)
        }
        Err(e) => {
            log::warn!("Save failed: {}", e);
            Err(e.into())
        }
    }
}

/// Save the editor's markup, creating the document on first save and
/// updating it afterwards.
pub async fn save(
    state: &mut EditorState,
    store: &dyn DocumentStore,
    request: SaveRequest,
) -> Result<MarkupDocument, PersistenceError> {
    let pending = begin_save(state, request)?;
    let result = {
        let _busy = BusyFlag(&mut state.is_saving);
        pending.send(store).await
    };
    finish_save(state, result)
}

/// Start opening a document by raising `is_loading`. Pair with [`finish_open`].
pub fn begin_open(state: &mut EditorState) -> Result<(), PersistenceError> {
    ensure_idle(state)?;
    state.is_loading = true;
    Ok(())
}

/// Complete an open started with [`begin_open`].
///
/// On success the document replaces the editor's markup with a fresh
/// history. On failure the previous document stays open. `is_loading` is
/// cleared either way.
pub fn finish_open(
    state: &mut EditorState,
    result: StorageResult<MarkupDocument>,
) -> Result<(), PersistenceError> {
    state.is_loading = false;
    match result {
        Ok(document) => {
            log::info!("Opened document {:?} ({} objects)", document.id, document.markup_data.len());
            state.install_document(document);
            state.dialogs.open = false;
            Ok(())
        }
        Err(e) => {
            log::warn!("Open failed: {}", e);
            Err(e.into())
        }
    }
}

/// Open a stored document.
pub async fn open(
    state: &mut EditorState,
    store: &dyn DocumentStore,
    id: &str,
) -> Result<(), PersistenceError> {
    begin_open(state)?;
    let result = {
        let _busy = BusyFlag(&mut state.is_loading);
        store.fetch_one(id).await
    };
    finish_open(state, result)
}

/// List stored documents.
pub async fn list(store: &dyn DocumentStore, filter: &ListFilter) -> Result<DocumentPage, PersistenceError> {
    Ok(store.fetch_many(filter).await?)
}

/// Delete a stored document. If it is the one being edited, the markup
/// stays in the editor as an unsaved document.
pub async fn delete(
    state: &mut EditorState,
    store: &dyn DocumentStore,
    id: &str,
) -> Result<(), PersistenceError> {
    store.delete(id).await?;
    if state.current_file.as_ref().and_then(|f| f.id.as_deref()) == Some(id) {
        state.current_file = None;
    }
    log::info!("Deleted document {}", id);
    Ok(())
}

/// Discard the session and start an unsaved document. Nothing is saved.
pub fn new_document(state: &mut EditorState) {
    state.reset();
}
