//! # HTML → Document
//!
//! Maps permissively-parsed HTML onto the node model.
//!
//! ## Tag mapping
//!
//! - `div`, `section` → Container
//! - `span` → Run (nested spans flatten into sibling runs)
//! - `p`, `h1`-`h6`, `ul`, `li`, `blockquote`, `hr`, `pre`, `img` → built-ins
//! - anything else → Element, subtree kept verbatim
//!
//! ## Placement
//!
//! Inline content found directly under a block parent is gathered into an
//! implicit paragraph. Nodes that still cannot be placed are dropped.

use crate::ast::{merge_text_nodes, Document, Node, NodeKind, Placement, Presentation};
use crate::dom::{self, HtmlElement, HtmlNode};
use crate::id_generator::IDGenerator;
use crate::serializer::image_alignment_style;
use folio_style::{Alignment, StyleMap};
use indexmap::IndexMap;

/// Content context a fragment is parsed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    Block,
    Inline,
}

/// Parse a whole document
pub fn parse_document(html: &str, ids: &mut IDGenerator) -> Document {
    let root_id = ids.new_id();
    let dom = dom::parse_html(html);
    let children = Builder { ids }.block_content(&dom);

    Document::new(Node::new(root_id, NodeKind::Doc).with_children(children))
}

/// Parse a fragment into nodes placeable in `context`
pub fn parse_fragment(html: &str, context: ParseContext, ids: &mut IDGenerator) -> Vec<Node> {
    let dom = dom::parse_html(html);
    let mut builder = Builder { ids };

    match context {
        ParseContext::Block => builder.block_content(&dom),
        ParseContext::Inline => builder.inline_content(&dom),
    }
}

struct Builder<'a> {
    ids: &'a mut IDGenerator,
}

impl Builder<'_> {
    fn node(&mut self, kind: NodeKind) -> Node {
        Node::new(self.ids.new_id(), kind)
    }

    /// Convert one HTML node into zero or more model nodes
    fn convert(&mut self, html: &HtmlNode) -> Vec<Node> {
        match html {
            HtmlNode::Text { text } => vec![self.node(NodeKind::Text { text: text.clone() })],
            HtmlNode::Element(el) => self.convert_element(el),
        }
    }

    fn convert_element(&mut self, el: &HtmlElement) -> Vec<Node> {
        let node = match el.tag.as_str() {
            "p" => {
                let children = self.inline_content(&el.children);
                self.with_passthrough(NodeKind::Paragraph, el, &[])
                    .with_children(children)
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = el.tag[1..].parse().unwrap_or(1);
                let children = self.inline_content(&el.children);
                self.with_passthrough(NodeKind::Heading { level }, el, &[])
                    .with_children(children)
            }
            "ul" => {
                let children = self.list_content(&el.children);
                self.with_passthrough(NodeKind::BulletList, el, &[])
                    .with_children(children)
            }
            "li" => {
                let children = self.block_content(&el.children);
                self.with_passthrough(NodeKind::ListItem, el, &[])
                    .with_children(children)
            }
            "blockquote" => {
                let children = self.block_content(&el.children);
                self.with_passthrough(NodeKind::Blockquote, el, &[])
                    .with_children(children)
            }
            "hr" => self.with_passthrough(NodeKind::HorizontalRule, el, &[]),
            "pre" => self.code_block(el),
            "img" => self.image(el),
            "div" | "section" => {
                let presentation = Presentation::from_attributes(el.attr("class"), el.attr("style"));
                let children = self.block_content(&el.children);
                self.with_passthrough(NodeKind::Container(presentation), el, &["class", "style"])
                    .with_children(children)
            }
            "span" => return self.run(el, &Presentation::default()),
            _ => self.opaque(el),
        };

        vec![node]
    }

    fn with_passthrough(&mut self, kind: NodeKind, el: &HtmlElement, skip: &[&str]) -> Node {
        let mut node = self.node(kind);
        node.attributes = passthrough(el, skip);
        node
    }

    fn code_block(&mut self, el: &HtmlElement) -> Node {
        let language = el
            .children
            .iter()
            .filter_map(HtmlNode::as_element)
            .find(|child| child.tag == "code")
            .and_then(|code| {
                code.classes()
                    .find_map(|class| class.strip_prefix("language-"))
                    .map(str::to_string)
            });

        let text = el.text_content();
        let mut node = self.with_passthrough(NodeKind::CodeBlock { language }, el, &[]);
        if !text.is_empty() {
            node.children.push(self.node(NodeKind::Text { text }));
        }
        node
    }

    fn image(&mut self, el: &HtmlElement) -> Node {
        let src = el.attr("src").unwrap_or_default().to_string();
        let align = el.attr("data-align").and_then(Alignment::parse);

        let mut node = self.with_passthrough(
            NodeKind::Image {
                src,
                align: align.unwrap_or_default(),
            },
            el,
            &["src", "data-align", "style"],
        );

        if let Some(style) = el.attr("style") {
            let mut style = StyleMap::parse(style);
            // Drop only the declarations the serializer derived from the alignment
            if let Some(align) = align {
                for (key, value) in image_alignment_style(align).iter() {
                    if style.get(key).is_some_and(|own| own.eq_ignore_ascii_case(value)) {
                        style.remove(key);
                    }
                }
            }
            if !style.is_empty() {
                node.attributes.insert("style".to_string(), style.serialize());
            }
        }

        node
    }

    /// Flatten a span (and any spans nested in it) into sibling runs
    fn run(&mut self, el: &HtmlElement, inherited: &Presentation) -> Vec<Node> {
        let own = Presentation::from_attributes(el.attr("class"), el.attr("style"));
        let presentation = inherited.merged_with(&own);
        let extra = passthrough(el, &["class", "style"]);
        let run_kind = NodeKind::Run(Presentation::default());

        let mut out = Vec::new();
        let mut group = Vec::new();

        for child in &el.children {
            if let HtmlNode::Element(inner) = child {
                if inner.tag == "span" {
                    self.flush_run(&presentation, &extra, &mut group, &mut out);
                    out.extend(self.run(inner, &presentation));
                    continue;
                }
            }

            for node in self.convert(child) {
                if run_kind.accepts(&node.kind) {
                    group.push(node);
                } else if matches!(node.kind.placement(), Placement::Inline | Placement::Either) {
                    self.flush_run(&presentation, &extra, &mut group, &mut out);
                    out.push(node);
                } else {
                    tracing::debug!(kind = node.kind.name(), "dropping block node inside span");
                }
            }
        }

        self.flush_run(&presentation, &extra, &mut group, &mut out);
        out
    }

    fn flush_run(
        &mut self,
        presentation: &Presentation,
        extra: &IndexMap<String, String>,
        group: &mut Vec<Node>,
        out: &mut Vec<Node>,
    ) {
        if group.is_empty() {
            return;
        }

        let children = merge_text_nodes(std::mem::take(group));

        // A span without style is not a run
        if presentation.style.is_empty() {
            out.extend(children);
            return;
        }

        let mut run = self
            .node(NodeKind::Run(presentation.clone()))
            .with_children(children);
        run.attributes = extra.clone();
        out.push(run);
    }

    fn opaque(&mut self, el: &HtmlElement) -> Node {
        let mut node = self.with_passthrough(NodeKind::Element { tag: el.tag.clone() }, el, &[]);

        for child in &el.children {
            let converted = match child {
                HtmlNode::Text { text } => self.node(NodeKind::Text { text: text.clone() }),
                HtmlNode::Element(inner) => self.opaque(inner),
            };
            node.children.push(converted);
        }

        node
    }

    fn block_content(&mut self, nodes: &[HtmlNode]) -> Vec<Node> {
        let mut blocks = Vec::new();
        let mut pending = Vec::new();

        for html in nodes {
            for node in self.convert(html) {
                match node.kind.placement() {
                    Placement::Block | Placement::Either => {
                        self.flush_paragraph(&mut pending, &mut blocks);
                        blocks.push(node);
                    }
                    Placement::Inline => {
                        if pending.is_empty() && is_blank_text(&node) {
                            continue;
                        }
                        pending.push(node);
                    }
                    Placement::ListItem | Placement::Root => {
                        tracing::debug!(kind = node.kind.name(), "dropping node outside a list");
                    }
                }
            }
        }

        self.flush_paragraph(&mut pending, &mut blocks);
        blocks
    }

    fn flush_paragraph(&mut self, pending: &mut Vec<Node>, blocks: &mut Vec<Node>) {
        while pending.last().is_some_and(is_blank_text) {
            pending.pop();
        }
        if pending.is_empty() {
            return;
        }

        let children = merge_text_nodes(std::mem::take(pending));
        blocks.push(self.node(NodeKind::Paragraph).with_children(children));
    }

    fn list_content(&mut self, nodes: &[HtmlNode]) -> Vec<Node> {
        let mut items = Vec::new();

        for html in nodes {
            for node in self.convert(html) {
                if node.kind.placement() == Placement::ListItem {
                    items.push(node);
                } else if !is_blank_text(&node) {
                    tracing::debug!(kind = node.kind.name(), "dropping non-item node inside list");
                }
            }
        }

        items
    }

    fn inline_content(&mut self, nodes: &[HtmlNode]) -> Vec<Node> {
        let mut inline = Vec::new();

        for html in nodes {
            for node in self.convert(html) {
                match node.kind.placement() {
                    Placement::Inline | Placement::Either => inline.push(node),
                    _ => {
                        tracing::debug!(kind = node.kind.name(), "dropping block node inside inline content");
                    }
                }
            }
        }

        merge_text_nodes(inline)
    }
}

fn passthrough(el: &HtmlElement, skip: &[&str]) -> IndexMap<String, String> {
    el.attributes
        .iter()
        .filter(|(name, _)| !skip.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn is_blank_text(node: &Node) -> bool {
    matches!(&node.kind, NodeKind::Text { text } if text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Document {
        parse_document(html, &mut IDGenerator::from_seed("t"))
    }

    fn kinds(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.kind.name()).collect()
    }

    #[test]
    fn test_parse_builtin_blocks() {
        let doc = parse("<h2>Title</h2><p>Body</p><ul><li><p>One</p></li></ul><hr><blockquote><p>Q</p></blockquote>");
        assert_eq!(
            kinds(doc.blocks()),
            vec!["heading", "paragraph", "bulletList", "horizontalRule", "blockquote"]
        );
        assert_eq!(doc.blocks()[0].kind, NodeKind::Heading { level: 2 });
    }

    #[test]
    fn test_div_becomes_container() {
        let doc = parse(r#"<div class="card fancy" style="padding: 24px; COLOR: red" data-x="1"><p>Hi</p></div>"#);
        let container = &doc.blocks()[0];

        let NodeKind::Container(presentation) = &container.kind else {
            panic!("expected container, got {:?}", container.kind);
        };
        assert_eq!(presentation.class_attribute().as_deref(), Some("card fancy"));
        assert_eq!(presentation.style.get("color"), Some("red"));
        assert_eq!(container.attributes.get("data-x").map(String::as_str), Some("1"));
        assert_eq!(kinds(&container.children), vec!["paragraph"]);
    }

    #[test]
    fn test_inline_content_in_container_is_wrapped() {
        let doc = parse(r#"<section style="padding: 8px">loose <b>text</b></section>"#);
        let container = &doc.blocks()[0];
        assert_eq!(kinds(&container.children), vec!["paragraph"]);
        assert_eq!(container.children[0].text_content(), "loose text");
    }

    #[test]
    fn test_nested_spans_flatten_into_runs() {
        let doc = parse(r#"<p><span style="color: red">a<span style="font-weight: bold">b</span>c</span></p>"#);
        let p = &doc.blocks()[0];
        assert_eq!(kinds(&p.children), vec!["run", "run", "run"]);

        let NodeKind::Run(middle) = &p.children[1].kind else {
            panic!("expected run");
        };
        assert_eq!(middle.style.serialize(), "color: red; font-weight: bold");
        assert_eq!(p.children[1].text_content(), "b");
    }

    #[test]
    fn test_unstyled_span_collapses_to_text() {
        let doc = parse("<p>a<span>b</span>c</p>");
        let p = &doc.blocks()[0];
        assert_eq!(kinds(&p.children), vec!["text"]);
        assert_eq!(p.text_content(), "abc");
    }

    #[test]
    fn test_span_without_style_is_not_a_run() {
        let doc = parse(r#"<p>a<span class="hl" data-x="1">b</span>c</p>"#);
        let p = &doc.blocks()[0];
        assert_eq!(kinds(&p.children), vec!["text"]);
        assert_eq!(p.text_content(), "abc");
    }

    #[test]
    fn test_code_block_language() {
        let doc = parse(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#);
        assert_eq!(
            doc.blocks()[0].kind,
            NodeKind::CodeBlock {
                language: Some("rust".to_string())
            }
        );
        assert_eq!(doc.blocks()[0].text_content(), "fn main() {}");
    }

    #[test]
    fn test_image_alignment_attribute() {
        let doc = parse(r#"<img src="a.png" alt="A" data-align="center" style="display: block; margin-left: auto; margin-right: auto; width: 50%">"#);
        let image = &doc.blocks()[0];
        assert_eq!(
            image.kind,
            NodeKind::Image {
                src: "a.png".to_string(),
                align: Alignment::Center
            }
        );
        assert_eq!(image.attributes.get("alt").map(String::as_str), Some("A"));
        assert_eq!(image.attributes.get("style").map(String::as_str), Some("width: 50%"));
    }

    #[test]
    fn test_image_keeps_author_margins() {
        let doc = parse(r#"<img src="a.png" data-align="center" style="display: block; margin-left: 10px; margin-right: auto">"#);
        assert_eq!(
            doc.blocks()[0].attributes.get("style").map(String::as_str),
            Some("margin-left: 10px")
        );
    }

    #[test]
    fn test_foreign_markup_is_kept_verbatim() {
        let doc = parse(r#"<ol start="3"><li><span style="color: red">x</span></li></ol>"#);
        let list = &doc.blocks()[0];
        assert_eq!(list.kind, NodeKind::Element { tag: "ol".to_string() });
        assert_eq!(list.children[0].kind, NodeKind::Element { tag: "li".to_string() });
        assert_eq!(
            list.children[0].children[0].kind,
            NodeKind::Element { tag: "span".to_string() }
        );
    }

    #[test]
    fn test_stray_list_item_is_dropped() {
        let doc = parse("<li>orphan</li><p>kept</p>");
        assert_eq!(kinds(doc.blocks()), vec!["paragraph"]);
    }

    #[test]
    fn test_inline_fragment_context() {
        let nodes = parse_fragment(
            r#"<span style="color: red">hot</span> take"#,
            ParseContext::Inline,
            &mut IDGenerator::from_seed("f"),
        );
        assert_eq!(kinds(&nodes), vec!["run", "text"]);
    }
}
