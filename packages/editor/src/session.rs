//! # Edit Session
//!
//! One user's editing state over one article: the document, the current
//! selection, undo history, the container panel and in-flight AI tasks.
//!
//! Selection-wide commands and container actions run as a single undo
//! step. If any command in the step fails, the document is rolled back to
//! where the step started.

use crate::ai::{paragraphs, AiAction, AiCompletion, AiOutcome, AiReceiver, AiRequest, AiSender, DiscardReason};
use crate::container::{ContainerManager, ContainerState, ContainerUpdate};
use crate::fragments::{insert_fragment, FragmentCatalog, InsertPosition};
use crate::persistence::ArticleRecord;
use crate::{Document, EditorError, Mutation, MutationResult, UndoStack};
use chrono::Utc;
use folio_compiler_html::{export, PlatformProfile};
use folio_parser::dom::escape_text;
use folio_parser::{ContentRule, Document as ASTDocument};
use folio_style::{Alignment, FontSizeStep, StyleUpdates};
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// AI request waiting for its completion
#[derive(Debug, Clone)]
struct PendingAi {
    action: AiAction,
    epoch: u64,
    target: Option<String>,
}

/// Single edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    /// Current selection (node ids)
    pub selected_nodes: Vec<String>,

    undo: UndoStack,
    containers: ContainerManager,
    fragments: FragmentCatalog,

    pending_ai: HashMap<String, PendingAi>,
    busy: HashSet<AiAction>,
    epoch: u64,
    ai_counter: u64,
    ai_sender: AiSender,
    ai_receiver: AiReceiver,
}

impl EditSession {
    /// Create a session with the built-in fragment catalog
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self::with_fragments(id, document, FragmentCatalog::builtin())
    }

    pub fn with_fragments(
        id: impl Into<String>,
        document: Document,
        fragments: FragmentCatalog,
    ) -> Self {
        let (ai_sender, ai_receiver) = mpsc::unbounded_channel();
        Self {
            id: id.into(),
            document,
            selected_nodes: Vec::new(),
            undo: UndoStack::new(),
            containers: ContainerManager::new(),
            fragments,
            pending_ai: HashMap::new(),
            busy: HashSet::new(),
            epoch: 0,
            ai_counter: 0,
            ai_sender,
            ai_receiver,
        }
    }

    /// Apply one mutation as its own undo step
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.undo.apply(mutation, &mut self.document)
    }

    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.document)
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn set_selection(&mut self, node_ids: Vec<String>) {
        self.selected_nodes = node_ids;
    }

    /// Merge style updates into every selected run
    pub fn style_selection(&mut self, updates: StyleUpdates) -> Result<(), EditorError> {
        self.for_each_selected("Style selection", |node_id| Mutation::SetRunStyle {
            node_id,
            updates: updates.clone(),
        })
    }

    pub fn align_selection(&mut self, align: Alignment) -> Result<(), EditorError> {
        self.for_each_selected("Align selection", |node_id| Mutation::SetAlignment {
            node_id,
            align,
        })
    }

    pub fn adjust_font_size(&mut self, step: FontSizeStep) -> Result<(), EditorError> {
        self.for_each_selected("Adjust font size", |node_id| Mutation::AdjustFontSize {
            node_id,
            step,
        })
    }

    // Container panel

    pub fn container_state(&self) -> &ContainerState {
        self.containers.state()
    }

    pub fn containers(&self) -> &ContainerManager {
        &self.containers
    }

    /// Open the container panel for the selection. Returns the container id.
    pub fn ensure_container(&mut self) -> Result<String, EditorError> {
        let selection = self.selected_nodes.clone();
        self.batch("Wrap in container", |session| {
            session
                .containers
                .ensure_container(&mut session.document, &selection)
        })
    }

    pub fn update_container(&mut self, update: ContainerUpdate) -> Result<(), EditorError> {
        self.batch("Update container", |session| {
            session
                .containers
                .update_container_style(&mut session.document, update)
        })
    }

    pub fn close_container_panel(&mut self) -> Result<(), EditorError> {
        Ok(self.containers.close_panel()?)
    }

    pub fn remove_container(&mut self) -> Result<(), EditorError> {
        self.batch("Remove container", |session| {
            session.containers.remove_container(&mut session.document)
        })
    }

    // Fragments

    pub fn fragments(&self) -> &FragmentCatalog {
        &self.fragments
    }

    pub fn insert_fragment(
        &mut self,
        fragment_id: &str,
        position: InsertPosition,
    ) -> Result<MutationResult, EditorError> {
        self.batch("Insert fragment", |session| {
            insert_fragment(&mut session.document, &session.fragments, fragment_id, position)
        })
    }

    // AI

    /// Issue an AI request and mark its action busy.
    ///
    /// The result is spliced in as paragraphs after the block holding
    /// `target`, or at the end of the document when there is no target.
    pub fn request_ai(
        &mut self,
        action: AiAction,
        prompt: impl Into<String>,
        target: Option<String>,
    ) -> Result<AiRequest, EditorError> {
        if self.busy.contains(&action) {
            return Err(EditorError::AiBusy(action));
        }

        self.ai_counter += 1;
        let id = format!("{}-ai-{}", self.id, self.ai_counter);

        self.busy.insert(action);
        self.pending_ai.insert(
            id.clone(),
            PendingAi {
                action,
                epoch: self.epoch,
                target,
            },
        );
        debug!(id = %id, action = %action, "AI request issued");

        Ok(AiRequest {
            id,
            action,
            prompt: prompt.into(),
        })
    }

    /// Sender for posting completions back to this session
    pub fn ai_sender(&self) -> AiSender {
        self.ai_sender.clone()
    }

    pub fn is_busy(&self, action: AiAction) -> bool {
        self.busy.contains(&action)
    }

    /// Navigate away. Results of requests issued before this are discarded.
    pub fn leave_context(&mut self) {
        self.epoch += 1;
    }

    /// Resolve one completion
    pub fn complete_ai(&mut self, completion: AiCompletion) -> Result<AiOutcome, EditorError> {
        let AiCompletion { id, result } = completion;
        let pending = self
            .pending_ai
            .remove(&id)
            .ok_or_else(|| EditorError::UnknownAiTask(id.clone()))?;
        self.busy.remove(&pending.action);

        if pending.epoch != self.epoch {
            return Ok(discard(id, DiscardReason::ContextChanged));
        }

        let text = match result {
            Ok(text) => text,
            Err(err) => {
                return Ok(AiOutcome::Failed {
                    id,
                    message: err.to_string(),
                })
            }
        };

        let parts = paragraphs(&text);
        if parts.is_empty() {
            return Ok(discard(id, DiscardReason::EmptyResult));
        }

        let position = match &pending.target {
            Some(target) => match after_block(self.document.ast(), target) {
                Some(position) => position,
                None => return Ok(discard(id, DiscardReason::TargetMissing)),
            },
            None => InsertPosition::DocumentEnd,
        };

        let html: String = parts
            .iter()
            .map(|part| format!("<p>{}</p>", escape_text(part)))
            .collect();

        let result = self.apply(Mutation::InsertHtml { html, position })?;
        Ok(AiOutcome::Applied {
            id,
            created: result.created,
        })
    }

    /// Drain every completion posted so far
    pub fn poll_ai(&mut self) -> Vec<AiOutcome> {
        let mut outcomes = Vec::new();

        while let Ok(completion) = self.ai_receiver.try_recv() {
            match self.complete_ai(completion) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => warn!(error = %err, "AI completion rejected"),
            }
        }

        outcomes
    }

    // Output

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    /// Platform-safe HTML for `profile`
    pub fn publish(&self, profile: &PlatformProfile) -> String {
        export(&self.to_html(), profile)
    }

    /// Snapshot the article for an external store
    pub fn to_record(
        &self,
        article_id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        cover_image: Option<String>,
    ) -> ArticleRecord {
        ArticleRecord {
            id: article_id.into(),
            title: title.into(),
            summary: summary.into(),
            cover_image,
            html: self.to_html(),
            updated_at: Utc::now(),
        }
    }

    fn for_each_selected(
        &mut self,
        description: &str,
        make: impl Fn(String) -> Mutation,
    ) -> Result<(), EditorError> {
        let selection = self.selected_nodes.clone();
        self.batch(description, |session| {
            for node_id in selection {
                session.undo.apply(make(node_id), &mut session.document)?;
            }
            Ok(())
        })
    }

    /// Run `f` as one undo step, rolling back on failure
    fn batch<T>(
        &mut self,
        description: &str,
        f: impl FnOnce(&mut Self) -> Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        let before = self.document.ast().clone();
        let version = self.document.version;

        self.undo.begin_batch(&self.document);
        self.undo.set_batch_description(description);
        let result = f(&mut *self);

        if result.is_err() && self.document.version != version {
            self.document.restore(before);
        }
        self.undo.end_batch(&self.document);
        result
    }
}

fn discard(id: String, reason: DiscardReason) -> AiOutcome {
    warn!(id = %id, reason = ?reason, "AI result discarded");
    AiOutcome::Discarded { id, reason }
}

/// Insert position right after the block that holds `target`
fn after_block(ast: &ASTDocument, target: &str) -> Option<InsertPosition> {
    let path = ast.root.path_to(target)?;
    if path.len() == 1 {
        return Some(InsertPosition::DocumentEnd);
    }

    let pair = path
        .windows(2)
        .rev()
        .find(|pair| pair[0].kind.content_rule() == ContentRule::Blocks)?;
    let index = pair[0]
        .children
        .iter()
        .position(|child| child.id == pair[1].id)?;

    Some(InsertPosition::Cursor {
        parent_id: pair[0].id.clone(),
        index: index + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiServiceError;

    fn session(html: &str) -> EditSession {
        EditSession::new("s1", Document::from_html("draft.html", html))
    }

    #[test]
    fn test_request_ids_are_sequential() {
        let mut session = session("<p>x</p>");

        let first = session.request_ai(AiAction::Continue, "go on", None).unwrap();
        let second = session.request_ai(AiAction::Polish, "polish", None).unwrap();

        assert_eq!(first.id, "s1-ai-1");
        assert_eq!(second.id, "s1-ai-2");
    }

    #[test]
    fn test_busy_action_rejects_reentry() {
        let mut session = session("<p>x</p>");
        session.request_ai(AiAction::Continue, "a", None).unwrap();

        let err = session.request_ai(AiAction::Continue, "b", None).unwrap_err();
        assert!(matches!(err, EditorError::AiBusy(AiAction::Continue)));
        assert!(session.request_ai(AiAction::Summarize, "c", None).is_ok());
    }

    #[test]
    fn test_completion_appends_paragraphs() {
        let mut session = session("<p>x</p>");
        let request = session.request_ai(AiAction::Continue, "a", None).unwrap();

        let outcome = session
            .complete_ai(AiCompletion {
                id: request.id,
                result: Ok("One.\n\nTwo & three.".to_string()),
            })
            .unwrap();

        assert!(matches!(outcome, AiOutcome::Applied { .. }));
        assert_eq!(
            session.to_html(),
            "<p>x</p><p>One.</p><p>Two &amp; three.</p>"
        );
        assert!(!session.is_busy(AiAction::Continue));
    }

    #[test]
    fn test_completion_lands_after_target_block() {
        let mut session = session("<p>a</p><p>b</p>");
        let target = session.document.ast().blocks()[0].children[0].id.clone();
        let request = session
            .request_ai(AiAction::Continue, "a", Some(target))
            .unwrap();

        session
            .complete_ai(AiCompletion {
                id: request.id,
                result: Ok("new".to_string()),
            })
            .unwrap();

        assert_eq!(session.to_html(), "<p>a</p><p>new</p><p>b</p>");
    }

    #[test]
    fn test_failed_completion_leaves_document() {
        let mut session = session("<p>x</p>");
        let request = session.request_ai(AiAction::Polish, "a", None).unwrap();

        let outcome = session
            .complete_ai(AiCompletion {
                id: request.id,
                result: Err(AiServiceError::Unavailable("offline".to_string())),
            })
            .unwrap();

        assert!(matches!(outcome, AiOutcome::Failed { .. }));
        assert_eq!(session.to_html(), "<p>x</p>");
        assert!(!session.is_busy(AiAction::Polish));
    }

    #[test]
    fn test_unknown_completion_errors() {
        let mut session = session("<p>x</p>");
        let err = session
            .complete_ai(AiCompletion {
                id: "nope".to_string(),
                result: Ok("x".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownAiTask(_)));
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let mut session = session("<p>a</p><p>b</p>");
        let text = session.document.ast().blocks()[0].children[0].id.clone();
        session.set_selection(vec![text, "missing".to_string()]);

        let before = session.to_html();
        assert!(session.style_selection(StyleUpdates::new().set("color", "red")).is_err());
        assert_eq!(session.to_html(), before);
        assert!(!session.undo_stack().can_undo());
    }
}
