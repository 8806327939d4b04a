//! # Undo/Redo Stack
//!
//! Tracks edit history as tree snapshots.
//!
//! ## Design
//!
//! - Each step records the tree before and after it ran
//! - Undo restores the "before" tree and moves the step to the redo stack
//! - Redo restores the "after" tree
//! - New steps clear the redo stack
//! - Batches group several mutations (or a whole container action) into one step

use crate::{Document, EditorError, Mutation, MutationResult};
use folio_parser::Document as ASTDocument;

/// A group of mutations undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// Tree before the first mutation
    pub before: ASTDocument,

    /// Tree after the last mutation
    pub after: ASTDocument,

    /// Optional description of this batch
    pub description: Option<String>,
}

#[derive(Debug)]
struct OpenBatch {
    before: ASTDocument,
    description: Option<String>,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<OpenBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: Mutation, doc: &mut Document) -> Result<MutationResult, EditorError> {
        if self.current_batch.is_some() {
            return doc.apply(mutation);
        }

        let before = doc.ast().clone();
        let result = doc.apply(mutation)?;
        self.push_batch(MutationBatch {
            before,
            after: doc.ast().clone(),
            description: None,
        });

        Ok(result)
    }

    /// Start a batch. Everything applied to `doc` until `end_batch` is one step.
    pub fn begin_batch(&mut self, doc: &Document) {
        self.current_batch = Some(OpenBatch {
            before: doc.ast().clone(),
            description: None,
        });
    }

    /// End the current batch and push it if the tree changed
    pub fn end_batch(&mut self, doc: &Document) {
        if let Some(batch) = self.current_batch.take() {
            if batch.before != *doc.ast() {
                self.push_batch(MutationBatch {
                    before: batch.before,
                    after: doc.ast().clone(),
                    description: batch.description,
                });
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the future
        self.redo_stack.clear();
    }

    /// Undo the most recent batch
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        match self.undo_stack.pop() {
            Some(batch) => {
                doc.restore(batch.before.clone());
                self.redo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        match self.redo_stack.pop() {
            Some(batch) => {
                doc.restore(batch.after.clone());
                self.undo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
