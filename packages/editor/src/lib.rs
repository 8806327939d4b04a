//! # Folio Editor
//!
//! Editing engine for structured articles.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: HTML → article tree                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save documents                      │
//! │  - Apply mutations with validation          │
//! │  - Container panel, fragments, AI splices   │
//! │  - Snapshot undo/redo                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: article HTML → platform HTML │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: HTML is produced on demand
//! 2. **Commands are validated**: a rejected command is a no-op
//! 3. **Styles merge, never overwrite**: runs keep what they already carry
//! 4. **AI is off the editing path**: results arrive on a channel and may be discarded
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{Document, EditSession, Mutation};
//! use folio_compiler_html::PlatformProfile;
//!
//! let doc = Document::load("article.html")?;
//! let mut session = EditSession::new("session-1", doc);
//!
//! session.set_selection(vec![paragraph_id]);
//! session.ensure_container()?;
//! session.close_container_panel()?;
//!
//! let html = session.publish(&PlatformProfile::wechat());
//! ```

mod ai;
mod container;
mod document;
mod errors;
mod fragments;
mod mutations;
mod persistence;
mod session;
mod undo_stack;

pub use ai::{
    paragraphs, AiAction, AiCompletion, AiOutcome, AiReceiver, AiRequest, AiSender,
    AiServiceError, DiscardReason, TextService,
};
pub use container::{
    ContainerDraft, ContainerError, ContainerManager, ContainerPreset, ContainerState,
    ContainerUpdate, Fill, Radius, Spacing, DEFAULT_CONTAINER_STYLE,
};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use fragments::{
    insert_fragment, Fragment, FragmentCatalog, FragmentCategory, FragmentError, InsertPosition,
};
pub use mutations::{AttributePatch, Mutation, MutationError, MutationResult};
pub use persistence::{ArticleRecord, ArticleStore, JsonFileStore, MemoryStore};
pub use session::EditSession;
pub use undo_stack::{MutationBatch, UndoStack};

// Re-export common types for convenience
pub use folio_parser::Document as ASTDocument;
pub use folio_style::{Alignment, FontSizeStep, StyleMap, StyleUpdates};
