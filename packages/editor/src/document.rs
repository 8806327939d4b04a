//! # Document Handle
//!
//! One article and its editing state.
//!
//! Documents can be:
//! - **Memory-backed**: seeded from an HTML string
//! - **File-backed**: loaded from and saved to an `.html` file
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Edit → Serialize → Save / Export
//!   ↓      ↓       ↓        ↓          ↓
//! File   Tree  Mutations   HTML       File
//! ```

use crate::{EditorError, Mutation, MutationResult};
use folio_parser::{parse_document, serialize_document, Document as ASTDocument, IDGenerator};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Editable article
#[derive(Debug)]
pub struct Document {
    /// Path to source file (or a name for memory-backed documents)
    pub path: PathBuf,

    /// Current version number (increments on each applied mutation)
    pub version: u64,

    /// Node id source for this document
    ids: IDGenerator,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only
    Memory { ast: ASTDocument },

    /// File-backed
    File { ast: ASTDocument, dirty: bool },
}

impl Document {
    /// Create document from HTML (memory-backed)
    pub fn from_html(path: impl Into<PathBuf>, html: &str) -> Self {
        let path = path.into();
        let mut ids = IDGenerator::new(&path.to_string_lossy());
        let ast = parse_document(html, &mut ids);

        Self {
            path,
            version: 0,
            ids,
            storage: DocumentStorage::Memory { ast },
        }
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref().to_path_buf();
        let source = std::fs::read_to_string(&path)?;
        let mut ids = IDGenerator::new(&path.to_string_lossy());
        let ast = parse_document(&source, &mut ids);

        Ok(Self {
            path,
            version: 0,
            ids,
            storage: DocumentStorage::File { ast, dirty: false },
        })
    }

    /// Current tree
    pub fn ast(&self) -> &ASTDocument {
        match &self.storage {
            DocumentStorage::Memory { ast } | DocumentStorage::File { ast, .. } => ast,
        }
    }

    fn ast_mut(&mut self) -> &mut ASTDocument {
        match &mut self.storage {
            DocumentStorage::Memory { ast } => ast,
            DocumentStorage::File { ast, dirty } => {
                *dirty = true;
                ast
            }
        }
    }

    /// Apply a mutation. The version only moves when the mutation succeeds.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let (ast, ids) = match &mut self.storage {
            DocumentStorage::Memory { ast } | DocumentStorage::File { ast, .. } => {
                (ast, &mut self.ids)
            }
        };
        let created = mutation.apply(ast, ids)?;

        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
        self.version += 1;
        debug!(version = self.version, created = created.len(), "Mutation applied");

        Ok(MutationResult {
            version: self.version,
            created,
        })
    }

    /// Swap in a previous tree (undo / redo)
    pub fn restore(&mut self, ast: ASTDocument) {
        *self.ast_mut() = ast;
        self.version += 1;
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory { .. } => false,
        }
    }

    /// Serialize the current tree
    pub fn to_html(&self) -> String {
        serialize_document(self.ast())
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let html = self.to_html();
        match &mut self.storage {
            DocumentStorage::File { dirty, .. } => {
                std::fs::write(&self.path, html)?;
                *dirty = false;
                Ok(())
            }
            DocumentStorage::Memory { .. } => Err(EditorError::NotFileBacked),
        }
    }
}
