//! # Document Commands
//!
//! Pure tree rewrites over the article model.
//!
//! ## Design Principles
//!
//! 1. **Validated first**: a command that fails validation leaves the tree untouched
//! 2. **Structure-preserving**: content rules hold after every command
//! 3. **Runs never go bare**: a run whose style map empties is unwrapped
//!
//! ## Inline targets
//!
//! Style commands address a Run, or a Text inside an inline parent. A Text
//! inside a Run styles that Run; any other Text is wrapped in a new Run.

use crate::fragments::InsertPosition;
use folio_parser::dom::is_void;
use folio_parser::{
    breaks_inline_flow, is_contextual_tag, is_model_tag, parse_fragment, ContentRule, Document,
    IDGenerator, Node, NodeKind, ParseContext, Presentation,
};
use folio_style::{
    alignment_updates, apply_run_style, apply_style_updates, font_size_updates, Alignment,
    FontSizeStep, MergeOutcome, StyleMap, StyleUpdates,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Document commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a node subtree. Ids on the subtree are replaced with fresh ones.
    InsertNode {
        parent_id: String,
        index: usize,
        node: Node,
    },

    /// Parse markup and splice it at a position
    InsertHtml {
        html: String,
        position: InsertPosition,
    },

    /// Wrap the contiguous sibling range spanned by `node_ids` in a container
    WrapInContainer {
        node_ids: Vec<String>,
        presentation: Presentation,
    },

    /// Replace a container with its children
    LiftContainer { container_id: String },

    /// Partial attribute update
    UpdateAttributes {
        node_id: String,
        patch: AttributePatch,
    },

    /// Merge style updates into an inline run
    SetRunStyle {
        node_id: String,
        updates: StyleUpdates,
    },

    /// Align an image or an inline run
    SetAlignment { node_id: String, align: Alignment },

    /// Step the font size of an inline run
    AdjustFontSize { node_id: String, step: FontSizeStep },

    /// Replace the content of a text node
    UpdateText { node_id: String, content: String },

    /// Remove a node and its descendants
    RemoveNode { node_id: String },
}

/// Partial update for [`Mutation::UpdateAttributes`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributePatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "StyleUpdates::is_empty")]
    pub style: StyleUpdates,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub set_attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_attributes: Vec<String>,
}

impl AttributePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(mut self, class_name: impl Into<String>) -> Self {
        self.add_classes.push(class_name.into());
        self
    }

    pub fn remove_class(mut self, class_name: impl Into<String>) -> Self {
        self.remove_classes.push(class_name.into());
        self
    }

    pub fn style(mut self, updates: StyleUpdates) -> Self {
        self.style = updates;
        self
    }

    pub fn set_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attributes.insert(name.into(), value.into());
        self
    }

    pub fn remove_attribute(mut self, name: impl Into<String>) -> Self {
        self.remove_attributes.push(name.into());
        self
    }

    fn touches_presentation(&self) -> bool {
        !self.add_classes.is_empty() || !self.remove_classes.is_empty() || !self.style.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Node is not a container: {0}")]
    NotAContainer(String),

    #[error("Node is not a run: {0}")]
    NotARun(String),

    #[error("Node is not text: {0}")]
    NotText(String),

    #[error("Node cannot be aligned: {0}")]
    NotAlignable(String),
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Ids of nodes created by the command
    pub created: Vec<String>,
}

/// Where a style command lands
enum InlineTarget {
    /// An existing run
    Run(String),
    /// A text node to wrap in a new run
    Wrap(String),
}

impl Mutation {
    /// Apply mutation with validation. Returns the ids of created nodes.
    pub fn apply(&self, doc: &mut Document, ids: &mut IDGenerator) -> Result<Vec<String>, MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::InsertNode { parent_id, index, node } => {
                Self::apply_insert_node(doc, ids, parent_id, *index, node)
            }

            Mutation::InsertHtml { html, position } => {
                Self::apply_insert_html(doc, ids, html, position)
            }

            Mutation::WrapInContainer { node_ids, presentation } => {
                Self::apply_wrap(doc, ids, node_ids, presentation)
            }

            Mutation::LiftContainer { container_id } => {
                Self::apply_lift(doc, container_id)?;
                Ok(Vec::new())
            }

            Mutation::UpdateAttributes { node_id, patch } => {
                Self::apply_update_attributes(doc, node_id, patch)?;
                Ok(Vec::new())
            }

            Mutation::SetRunStyle { node_id, updates } => {
                Self::restyle(doc, ids, node_id, |_| updates.clone())
            }

            Mutation::SetAlignment { node_id, align } => {
                if let Some(NodeKind::Image { align: current, .. }) =
                    doc.find_mut(node_id).map(|node| &mut node.kind)
                {
                    *current = *align;
                    return Ok(Vec::new());
                }
                Self::restyle(doc, ids, node_id, |_| alignment_updates(*align))
            }

            Mutation::AdjustFontSize { node_id, step } => {
                Self::restyle(doc, ids, node_id, |style| font_size_updates(style, *step))
            }

            Mutation::UpdateText { node_id, content } => {
                let node = find_mut(doc, node_id)?;
                if let NodeKind::Text { text } = &mut node.kind {
                    *text = content.clone();
                }
                Ok(Vec::new())
            }

            Mutation::RemoveNode { node_id } => {
                let (parent, index) = doc
                    .parent_of_mut(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                parent.children.remove(index);
                if holds_inline(&parent.kind) {
                    parent.normalize_text();
                }
                Ok(Vec::new())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::InsertNode { parent_id, node, .. } => {
                let parent = doc
                    .find(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
                let node = normalized(node);
                check_placement(parent, &node)?;
                check_subtree(&node, holds_inline(&parent.kind))
            }

            Mutation::InsertHtml { position, .. } => resolve_anchor(doc, position).map(|_| ()),

            Mutation::WrapInContainer { node_ids, .. } => wrap_range(doc, node_ids).map(|_| ()),

            Mutation::LiftContainer { container_id } => {
                let node = find(doc, container_id)?;
                if !node.kind.is_container() {
                    return Err(MutationError::NotAContainer(container_id.clone()));
                }
                Ok(())
            }

            Mutation::UpdateAttributes { node_id, patch } => {
                let node = find(doc, node_id)?;
                let presented = node.kind.presentation().is_some();

                if patch.touches_presentation() && !presented {
                    return Err(MutationError::InvalidStructure(format!(
                        "{} has no class set or style map",
                        node.kind.name()
                    )));
                }
                if presented
                    && patch
                        .set_attributes
                        .keys()
                        .any(|name| name == "class" || name == "style")
                {
                    return Err(MutationError::InvalidStructure(
                        "class and style are presentation, not passthrough attributes".to_string(),
                    ));
                }
                Ok(())
            }

            Mutation::SetRunStyle { node_id, .. } | Mutation::AdjustFontSize { node_id, .. } => {
                inline_target(doc, node_id).map(|_| ())
            }

            Mutation::SetAlignment { node_id, .. } => {
                let node = find(doc, node_id)?;
                if matches!(node.kind, NodeKind::Image { .. }) {
                    return Ok(());
                }
                inline_target(doc, node_id)
                    .map(|_| ())
                    .map_err(|_| MutationError::NotAlignable(node_id.clone()))
            }

            Mutation::UpdateText { node_id, .. } => {
                let node = find(doc, node_id)?;
                if !node.kind.is_text() {
                    return Err(MutationError::NotText(node_id.clone()));
                }
                Ok(())
            }

            Mutation::RemoveNode { node_id } => {
                if doc.root.id == *node_id {
                    return Err(MutationError::InvariantViolation(
                        "the document root cannot be removed".to_string(),
                    ));
                }
                find(doc, node_id).map(|_| ())
            }
        }
    }

    fn apply_insert_node(
        doc: &mut Document,
        ids: &mut IDGenerator,
        parent_id: &str,
        index: usize,
        node: &Node,
    ) -> Result<Vec<String>, MutationError> {
        let mut node = normalized(node);
        reassign_ids(&mut node, ids);
        let mut created = vec![node.id.clone()];

        let parent = doc
            .find_mut(parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.to_string()))?;
        let index = index.min(parent.children.len());
        parent.children.insert(index, node);
        if holds_inline(&parent.kind) {
            parent.normalize_text();
            created.retain(|id| parent.children.iter().any(|child| child.id == *id));
        }

        Ok(created)
    }

    fn apply_insert_html(
        doc: &mut Document,
        ids: &mut IDGenerator,
        html: &str,
        position: &InsertPosition,
    ) -> Result<Vec<String>, MutationError> {
        let (parent_id, index, context) = resolve_anchor(doc, position)?;
        let nodes = parse_fragment(html, context, ids);

        let parent = doc
            .find_mut(&parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

        let placeable: Vec<Node> = nodes
            .into_iter()
            .filter(|node| {
                let accepted = parent.kind.accepts(&node.kind);
                if !accepted {
                    debug!(parent = parent.kind.name(), kind = node.kind.name(), "dropping unplaceable fragment node");
                }
                accepted
            })
            .collect();

        let mut created: Vec<String> = placeable.iter().map(|node| node.id.clone()).collect();
        let index = index.min(parent.children.len());
        parent.children.splice(index..index, placeable);

        if context == ParseContext::Inline {
            parent.normalize_text();
            created.retain(|id| parent.children.iter().any(|child| child.id == *id));
        }

        Ok(created)
    }

    fn apply_wrap(
        doc: &mut Document,
        ids: &mut IDGenerator,
        node_ids: &[String],
        presentation: &Presentation,
    ) -> Result<Vec<String>, MutationError> {
        let (parent_id, start, end) = wrap_range(doc, node_ids)?;
        let container_id = ids.new_id();

        let parent = doc
            .find_mut(&parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
        let wrapped: Vec<Node> = parent.children.drain(start..=end).collect();
        let container = Node::new(container_id.clone(), NodeKind::Container(presentation.clone()))
            .with_children(wrapped);
        parent.children.insert(start, container);

        Ok(vec![container_id])
    }

    fn apply_lift(doc: &mut Document, container_id: &str) -> Result<(), MutationError> {
        let (parent, index) = doc
            .parent_of_mut(container_id)
            .ok_or_else(|| MutationError::ParentNotFound(container_id.to_string()))?;
        let container = parent.children.remove(index);
        parent.children.splice(index..index, container.children);
        Ok(())
    }

    fn apply_update_attributes(
        doc: &mut Document,
        node_id: &str,
        patch: &AttributePatch,
    ) -> Result<(), MutationError> {
        let node = find_mut(doc, node_id)?;

        for name in &patch.remove_attributes {
            node.attributes.shift_remove(name);
        }
        for (name, value) in &patch.set_attributes {
            node.attributes.insert(name.clone(), value.clone());
        }

        let is_run = node.kind.is_run();
        if let Some(presentation) = node.kind.presentation_mut() {
            for class_name in &patch.remove_classes {
                presentation.class_names.shift_remove(class_name);
            }
            presentation
                .class_names
                .extend(patch.add_classes.iter().cloned());

            if !patch.style.is_empty() {
                presentation.style = if is_run {
                    apply_run_style(&presentation.style, &patch.style).into_style()
                } else {
                    apply_style_updates(&presentation.style, &patch.style)
                };
            }
        }

        if is_bare_run(node) {
            unwrap_run(doc, node_id)?;
        }
        Ok(())
    }

    /// Run the merge engine on an inline target
    fn restyle(
        doc: &mut Document,
        ids: &mut IDGenerator,
        node_id: &str,
        make_updates: impl FnOnce(&StyleMap) -> StyleUpdates,
    ) -> Result<Vec<String>, MutationError> {
        match inline_target(doc, node_id)? {
            InlineTarget::Run(run_id) => {
                let run = find_mut(doc, &run_id)?;
                let presentation = run
                    .kind
                    .presentation_mut()
                    .ok_or_else(|| MutationError::NotARun(run_id.clone()))?;

                let updates = make_updates(&presentation.style);
                presentation.style = match apply_run_style(&presentation.style, &updates) {
                    MergeOutcome::Styled(style) => style,
                    MergeOutcome::Unmark => StyleMap::new(),
                };

                if is_bare_run(run) {
                    unwrap_run(doc, &run_id)?;
                }
                Ok(Vec::new())
            }

            InlineTarget::Wrap(text_id) => {
                let updates = make_updates(&StyleMap::new());
                let MergeOutcome::Styled(style) = apply_run_style(&StyleMap::new(), &updates) else {
                    return Ok(Vec::new());
                };

                let (parent, index) = doc
                    .parent_of_mut(&text_id)
                    .ok_or_else(|| MutationError::ParentNotFound(text_id.clone()))?;
                let text = parent.children.remove(index);
                let run_id = ids.new_id();
                let run = Node::new(run_id.clone(), NodeKind::Run(Presentation::new(style)))
                    .with_children(vec![text]);
                parent.children.insert(index, run);

                Ok(vec![run_id])
            }
        }
    }
}

fn find<'a>(doc: &'a Document, id: &str) -> Result<&'a Node, MutationError> {
    doc.find(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

fn find_mut<'a>(doc: &'a mut Document, id: &str) -> Result<&'a mut Node, MutationError> {
    doc.find_mut(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))
}

fn holds_inline(kind: &NodeKind) -> bool {
    matches!(kind.content_rule(), ContentRule::Inline | ContentRule::RunContent)
}

/// A run whose style map is empty; its classes and attributes go with the mark
fn is_bare_run(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Run(presentation) if presentation.style.is_empty())
}

/// Replace a run with its children and merge the text that meets
fn unwrap_run(doc: &mut Document, run_id: &str) -> Result<(), MutationError> {
    let (parent, index) = doc
        .parent_of_mut(run_id)
        .ok_or_else(|| MutationError::ParentNotFound(run_id.to_string()))?;
    let run = parent.children.remove(index);
    parent.children.splice(index..index, run.children);
    parent.normalize_text();
    Ok(())
}

fn inline_target(doc: &Document, node_id: &str) -> Result<InlineTarget, MutationError> {
    let node = find(doc, node_id)?;

    match &node.kind {
        NodeKind::Run(_) => Ok(InlineTarget::Run(node.id.clone())),
        NodeKind::Text { .. } => {
            let (parent, _) = doc
                .parent_of(node_id)
                .ok_or_else(|| MutationError::ParentNotFound(node_id.to_string()))?;

            if parent.kind.is_run() {
                Ok(InlineTarget::Run(parent.id.clone()))
            } else if parent.kind.accepts(&NodeKind::Run(Presentation::default())) {
                Ok(InlineTarget::Wrap(node.id.clone()))
            } else {
                Err(MutationError::NotARun(node_id.to_string()))
            }
        }
        _ => Err(MutationError::NotARun(node_id.to_string())),
    }
}

fn check_placement(parent: &Node, node: &Node) -> Result<(), MutationError> {
    if !parent.kind.accepts(&node.kind) {
        return Err(MutationError::InvariantViolation(format!(
            "{} cannot contain {}",
            parent.kind.name(),
            node.kind.name()
        )));
    }

    if let NodeKind::Element { tag } = &node.kind {
        let opaque_parent = matches!(parent.kind, NodeKind::Element { .. });
        if !opaque_parent && (is_model_tag(tag) || is_contextual_tag(tag)) {
            return Err(MutationError::InvalidStructure(format!(
                "<{}> would not parse back as foreign markup here",
                tag
            )));
        }
    }
    Ok(())
}

/// Reject subtrees whose HTML would parse back into a different tree.
/// `inline` is true when the node sits in inline flow.
fn check_subtree(node: &Node, inline: bool) -> Result<(), MutationError> {
    match &node.kind {
        NodeKind::Run(_) if node.children.is_empty() || is_bare_run(node) => {
            return Err(MutationError::InvariantViolation(
                "a run needs a style map and content".to_string(),
            ));
        }
        NodeKind::Heading { level } if !(1..=6).contains(level) => {
            return Err(MutationError::InvalidStructure(format!(
                "heading level {} is outside 1-6",
                level
            )));
        }
        NodeKind::Text { text } if text.is_empty() => {
            return Err(MutationError::InvalidStructure("empty text node".to_string()));
        }
        NodeKind::Element { tag } if inline && breaks_inline_flow(tag) => {
            return Err(MutationError::InvalidStructure(format!(
                "<{}> cannot sit in inline flow",
                tag
            )));
        }
        NodeKind::Element { tag } if is_void(tag) && !node.children.is_empty() => {
            return Err(MutationError::InvalidStructure(format!(
                "<{}> cannot have children",
                tag
            )));
        }
        _ => {}
    }

    let reserved: &[&str] = match &node.kind {
        NodeKind::Container(_) | NodeKind::Run(_) => &["class", "style"],
        NodeKind::Image { .. } => &["src", "data-align"],
        _ => &[],
    };
    if let Some(name) = node.attributes.keys().find(|name| reserved.contains(&name.as_str())) {
        return Err(MutationError::InvalidStructure(format!(
            "{} is modelled on {}, not a passthrough attribute",
            name,
            node.kind.name()
        )));
    }

    let inline = match node.kind.content_rule() {
        ContentRule::Inline | ContentRule::RunContent => true,
        ContentRule::Opaque => inline,
        _ => false,
    };
    for child in &node.children {
        check_placement(node, child)?;
        check_subtree(child, inline)?;
    }
    Ok(())
}

/// Copy of `node` with adjacent text merged and empty text dropped throughout
fn normalized(node: &Node) -> Node {
    let mut node = node.clone();
    normalize_subtree(&mut node);
    node
}

fn normalize_subtree(node: &mut Node) {
    node.normalize_text();
    for child in &mut node.children {
        normalize_subtree(child);
    }
}

fn reassign_ids(node: &mut Node, ids: &mut IDGenerator) {
    node.id = ids.new_id();
    for child in &mut node.children {
        reassign_ids(child, ids);
    }
}

/// Resolve a position to (parent id, index, parse context)
fn resolve_anchor(
    doc: &Document,
    position: &InsertPosition,
) -> Result<(String, usize, ParseContext), MutationError> {
    match position {
        InsertPosition::Cursor { parent_id, index } => {
            let parent = doc
                .find(parent_id)
                .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

            let context = match parent.kind.content_rule() {
                ContentRule::Blocks => ParseContext::Block,
                ContentRule::Inline | ContentRule::RunContent => ParseContext::Inline,
                _ => {
                    return Err(MutationError::InvalidStructure(format!(
                        "cannot insert markup into {}",
                        parent.kind.name()
                    )))
                }
            };
            Ok((parent_id.clone(), *index, context))
        }
        InsertPosition::DocumentStart => Ok((doc.root.id.clone(), 0, ParseContext::Block)),
        InsertPosition::DocumentEnd => Ok((
            doc.root.id.clone(),
            doc.root.children.len(),
            ParseContext::Block,
        )),
    }
}

/// Sibling range to wrap: (parent id, first index, last index)
fn wrap_range(doc: &Document, node_ids: &[String]) -> Result<(String, usize, usize), MutationError> {
    let first = node_ids
        .first()
        .ok_or_else(|| MutationError::InvalidStructure("nothing to wrap".to_string()))?;

    find(doc, first)?;
    let (parent, _) = doc
        .parent_of(first)
        .ok_or_else(|| MutationError::InvalidStructure("the document root cannot be wrapped".to_string()))?;

    if !parent.kind.accepts(&NodeKind::Container(Presentation::default())) {
        return Err(MutationError::InvariantViolation(format!(
            "{} cannot contain a container",
            parent.kind.name()
        )));
    }

    let mut start = usize::MAX;
    let mut end = 0;
    for id in node_ids {
        let index = parent
            .children
            .iter()
            .position(|child| child.id == *id)
            .ok_or_else(|| {
                if doc.contains(id) {
                    MutationError::InvalidStructure("wrapped nodes must be siblings".to_string())
                } else {
                    MutationError::NodeNotFound(id.clone())
                }
            })?;
        start = start.min(index);
        end = end.max(index);
    }

    Ok((parent.id.clone(), start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_parser::parse_document;

    fn doc(html: &str) -> (Document, IDGenerator) {
        let mut ids = IDGenerator::from_seed("t");
        let doc = parse_document(html, &mut ids);
        (doc, ids)
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::SetRunStyle {
            node_id: "t-4".to_string(),
            updates: StyleUpdates::new().set("color", "red").clear("background-color"),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_validation_rejects_empty_ids() {
        let (doc, _) = doc("<p>x</p>");

        let mutation = Mutation::UpdateText {
            node_id: "".to_string(),
            content: "test".to_string(),
        };

        assert_eq!(
            mutation.validate(&doc),
            Err(MutationError::NodeNotFound("".to_string()))
        );
    }

    #[test]
    fn test_text_under_doc_is_invariant_violation() {
        let (mut doc, mut ids) = doc("<p>x</p>");
        let before = doc.clone();

        let mutation = Mutation::InsertNode {
            parent_id: doc.root.id.clone(),
            index: 0,
            node: Node::text("new", "stray"),
        };

        assert!(matches!(
            mutation.apply(&mut doc, &mut ids),
            Err(MutationError::InvariantViolation(_))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_wrap_range_requires_siblings() {
        let (doc, _) = doc("<p>a</p><div style=\"padding: 4px\"><p>b</p></div>");
        let outer = doc.blocks()[0].id.clone();
        let inner = doc.blocks()[1].children[0].id.clone();

        assert!(matches!(
            wrap_range(&doc, &[outer, inner]),
            Err(MutationError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_unmark_merges_text() {
        let (mut doc, mut ids) = doc(r#"<p>a<span style="color: red">b</span>c</p>"#);
        let run_id = doc.blocks()[0].children[1].id.clone();

        Mutation::SetRunStyle {
            node_id: run_id,
            updates: StyleUpdates::new().clear("color"),
        }
        .apply(&mut doc, &mut ids)
        .unwrap();

        let p = &doc.blocks()[0];
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.text_content(), "abc");
    }
}
