//! SiteMark Core Library
//!
//! Data structures and logic for the SiteMark blueprint markup editor:
//! the markup object model, tools, viewport, undo history and persistence.

pub mod blueprint;
pub mod config;
pub mod document;
pub mod editor;
pub mod history;
pub mod markup;
pub mod persistence;
pub mod shortcuts;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use blueprint::{Blueprint, BlueprintError, BlueprintFormat};
pub use config::{ConfigError, EditorConfig};
pub use document::{BlueprintRef, DocumentDraft, DocumentLocation, DocumentPage, DocumentSummary, ListFilter, MarkupDocument};
pub use editor::{DialogFlags, EditorState, PointerOutcome};
pub use history::History;
pub use markup::{MarkupColor, MarkupObject, MarkupShape, ObjectId};
pub use persistence::{PendingSave, PersistenceError, SaveRequest};
pub use shortcuts::{EditorCommand, Key, KeyChord, ShortcutRegistry};
pub use storage::{DocumentStore, FileStore, MemoryStore, StorageError, StorageResult};
pub use tools::{Tool, ToolState};
pub use viewport::Viewport;
