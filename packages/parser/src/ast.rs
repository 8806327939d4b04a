//! # Document Node Model
//!
//! A closed set of node kinds. Two of them are custom to the editor:
//!
//! - [`NodeKind::Container`]: block grouping with a class set and a style map
//! - [`NodeKind::Run`]: inline text carrying only a class set and a style map
//!
//! ## Content rules
//!
//! ```text
//! Doc, Container, Blockquote, ListItem → blocks
//! BulletList                          → list items
//! Paragraph, Heading                  → text, runs, inline elements, images
//! Run                                 → text, inline elements
//! CodeBlock                           → text
//! Element                             → anything (opaque)
//! ```

use folio_style::{Alignment, StyleMap};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Presentation carried by containers and runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub class_names: IndexSet<String>,
    #[serde(default, skip_serializing_if = "StyleMap::is_empty")]
    pub style: StyleMap,
}

impl Presentation {
    pub fn new(style: StyleMap) -> Self {
        Self {
            class_names: IndexSet::new(),
            style,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_names.insert(class_name.into());
        self
    }

    /// Build from raw `class` / `style` attribute values
    pub fn from_attributes(class: Option<&str>, style: Option<&str>) -> Self {
        Self {
            class_names: class
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            style: style.map(StyleMap::parse).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class_names.is_empty() && self.style.is_empty()
    }

    /// Layer `inner` over `self` (outer first, inner wins)
    pub fn merged_with(&self, inner: &Presentation) -> Presentation {
        let mut merged = self.clone();
        merged.class_names.extend(inner.class_names.iter().cloned());
        merged.style.cascade(&inner.style);
        merged
    }

    pub fn class_attribute(&self) -> Option<String> {
        if self.class_names.is_empty() {
            None
        } else {
            Some(
                self.class_names
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        }
    }
}

/// Node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading { level: u8 },
    BulletList,
    ListItem,
    Blockquote,
    HorizontalRule,
    CodeBlock { language: Option<String> },
    Image { src: String, align: Alignment },
    Container(Presentation),
    Run(Presentation),
    Text { text: String },
    /// Foreign markup kept verbatim
    Element { tag: String },
}

/// Where a node may be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Root,
    Block,
    Inline,
    /// Accepted by both block and inline parents
    Either,
    ListItem,
}

/// What a node may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRule {
    Blocks,
    ListItems,
    Inline,
    RunContent,
    TextOnly,
    Opaque,
    Empty,
}

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "audio", "center", "dd", "details", "dialog", "dir", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "header", "hgroup", "iframe",
    "listing", "main", "menu", "nav", "ol", "plaintext", "search", "summary", "table", "video",
    "xmp",
];

/// Tags the parser maps onto built-in kinds
const MODEL_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "li", "blockquote", "hr", "pre", "img", "div",
    "section", "span",
];

/// Tags that only survive inside a table or the document head
const CONTEXTUAL_TAGS: &[&str] = &[
    "body", "caption", "col", "colgroup", "frame", "frameset", "head", "html", "tbody", "td",
    "tfoot", "th", "thead", "tr",
];

/// Whether a foreign tag sits in block flow
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Whether the parser reads `tag` as a built-in kind instead of an Element
pub fn is_model_tag(tag: &str) -> bool {
    MODEL_TAGS.contains(&tag)
}

pub fn is_contextual_tag(tag: &str) -> bool {
    CONTEXTUAL_TAGS.contains(&tag)
}

/// Whether an open `tag` ends an enclosing paragraph in HTML
pub fn breaks_inline_flow(tag: &str) -> bool {
    is_block_tag(tag) || (is_model_tag(tag) && !matches!(tag, "span" | "img"))
}

impl NodeKind {
    pub fn placement(&self) -> Placement {
        match self {
            NodeKind::Doc => Placement::Root,
            NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::BulletList
            | NodeKind::Blockquote
            | NodeKind::HorizontalRule
            | NodeKind::CodeBlock { .. }
            | NodeKind::Container(_) => Placement::Block,
            NodeKind::ListItem => Placement::ListItem,
            NodeKind::Image { .. } => Placement::Either,
            NodeKind::Run(_) | NodeKind::Text { .. } => Placement::Inline,
            NodeKind::Element { tag } => {
                if is_block_tag(tag) {
                    Placement::Block
                } else {
                    Placement::Inline
                }
            }
        }
    }

    pub fn content_rule(&self) -> ContentRule {
        match self {
            NodeKind::Doc | NodeKind::Container(_) | NodeKind::Blockquote | NodeKind::ListItem => {
                ContentRule::Blocks
            }
            NodeKind::BulletList => ContentRule::ListItems,
            NodeKind::Paragraph | NodeKind::Heading { .. } => ContentRule::Inline,
            NodeKind::Run(_) => ContentRule::RunContent,
            NodeKind::CodeBlock { .. } => ContentRule::TextOnly,
            NodeKind::Element { .. } => ContentRule::Opaque,
            NodeKind::HorizontalRule | NodeKind::Image { .. } | NodeKind::Text { .. } => {
                ContentRule::Empty
            }
        }
    }

    /// Whether `child` may be placed directly inside a node of this kind
    pub fn accepts(&self, child: &NodeKind) -> bool {
        let placement = child.placement();
        match self.content_rule() {
            ContentRule::Blocks => matches!(placement, Placement::Block | Placement::Either),
            ContentRule::ListItems => placement == Placement::ListItem,
            ContentRule::Inline => matches!(placement, Placement::Inline | Placement::Either),
            ContentRule::RunContent => {
                matches!(child, NodeKind::Text { .. } | NodeKind::Element { .. })
                    && placement == Placement::Inline
            }
            ContentRule::TextOnly => matches!(child, NodeKind::Text { .. }),
            ContentRule::Opaque => matches!(child, NodeKind::Text { .. } | NodeKind::Element { .. }),
            ContentRule::Empty => false,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container(_))
    }

    pub fn is_run(&self) -> bool {
        matches!(self, NodeKind::Run(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text { .. })
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        match self {
            NodeKind::Container(p) | NodeKind::Run(p) => Some(p),
            _ => None,
        }
    }

    pub fn presentation_mut(&mut self) -> Option<&mut Presentation> {
        match self {
            NodeKind::Container(p) | NodeKind::Run(p) => Some(p),
            _ => None,
        }
    }

    /// Short name for logs and error messages
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading { .. } => "heading",
            NodeKind::BulletList => "bulletList",
            NodeKind::ListItem => "listItem",
            NodeKind::Blockquote => "blockquote",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::CodeBlock { .. } => "codeBlock",
            NodeKind::Image { .. } => "image",
            NodeKind::Container(_) => "container",
            NodeKind::Run(_) => "run",
            NodeKind::Text { .. } => "text",
            NodeKind::Element { tag } => tag,
        }
    }
}

/// Document tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Attributes the model does not interpret, kept in source order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Text { text: text.into() })
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Parent of `id` and the child's index within it
    pub fn parent_of(&self, id: &str) -> Option<(&Node, usize)> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            return Some((self, pos));
        }
        self.children.iter().find_map(|child| child.parent_of(id))
    }

    pub fn parent_of_mut(&mut self, id: &str) -> Option<(&mut Node, usize)> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            return Some((self, pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.parent_of_mut(id))
    }

    /// Chain of nodes from `self` down to `id` (inclusive)
    pub fn path_to(&self, id: &str) -> Option<Vec<&Node>> {
        if self.id == id {
            return Some(vec![self]);
        }
        for child in &self.children {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self);
                return Some(path);
            }
        }
        None
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        match &self.kind {
            NodeKind::Text { text } => text.clone(),
            _ => self.children.iter().map(Node::text_content).collect(),
        }
    }

    /// Compare kinds, attributes and children, ignoring ids
    pub fn same_structure(&self, other: &Node) -> bool {
        self.kind == other.kind
            && self.attributes == other.attributes
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }

    /// Merge adjacent text children and drop empty ones
    pub fn normalize_text(&mut self) {
        self.children = merge_text_nodes(std::mem::take(&mut self.children));
    }

    /// Visit this node and every descendant
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

/// Merge adjacent text nodes and drop empty ones
pub fn merge_text_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());

    for node in nodes {
        if let NodeKind::Text { text } = &node.kind {
            if text.is_empty() {
                continue;
            }
            if let Some(Node {
                kind: NodeKind::Text { text: prev },
                ..
            }) = merged.last_mut()
            {
                prev.push_str(text);
                continue;
            }
        }
        merged.push(node);
    }

    merged
}

/// A whole article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn parent_of(&self, id: &str) -> Option<(&Node, usize)> {
        self.root.parent_of(id)
    }

    pub fn parent_of_mut(&mut self, id: &str) -> Option<(&mut Node, usize)> {
        self.root.parent_of_mut(id)
    }

    /// Ancestors of `id`, root first, excluding the node itself
    pub fn ancestors(&self, id: &str) -> Vec<&Node> {
        let mut path = self.root.path_to(id).unwrap_or_default();
        path.pop();
        path
    }

    /// Nearest ancestor-or-self container of `id`
    pub fn enclosing_container(&self, id: &str) -> Option<&Node> {
        let path = self.root.path_to(id)?;
        path.into_iter().rev().find(|n| n.kind.is_container())
    }

    /// Top-level blocks
    pub fn blocks(&self) -> &[Node] {
        &self.root.children
    }

    pub fn same_structure(&self, other: &Document) -> bool {
        self.root.same_structure(&other.root)
    }
}
