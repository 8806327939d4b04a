//! # Document → HTML
//!
//! Inverse of the parser: re-parsing the output yields the same structure.
//! Containers serialize as `div`, runs as `span`. Image alignment is written
//! both as `data-align` and as the style that realizes it.

use crate::ast::{Document, Node, NodeKind, Presentation};
use crate::dom::{self, HtmlElement, HtmlNode};
use folio_style::{Alignment, StyleMap};

/// Serialize the document body (the root itself emits no tag)
pub fn serialize_document(doc: &Document) -> String {
    serialize_nodes(&doc.root.children)
}

pub fn serialize_nodes(nodes: &[Node]) -> String {
    let dom: Vec<HtmlNode> = nodes.iter().flat_map(to_dom).collect();
    dom::to_html(&dom)
}

/// Convert a node to HTML DOM nodes
pub fn to_dom(node: &Node) -> Vec<HtmlNode> {
    let children = || -> Vec<HtmlNode> { node.children.iter().flat_map(to_dom).collect() };

    let element = match &node.kind {
        NodeKind::Doc => return children(),
        NodeKind::Text { text } => return vec![HtmlNode::text(text.clone())],
        NodeKind::Paragraph => plain("p", node).with_children(children()),
        NodeKind::Heading { level } => plain(&format!("h{}", level), node).with_children(children()),
        NodeKind::BulletList => plain("ul", node).with_children(children()),
        NodeKind::ListItem => plain("li", node).with_children(children()),
        NodeKind::Blockquote => plain("blockquote", node).with_children(children()),
        NodeKind::HorizontalRule => plain("hr", node),
        NodeKind::CodeBlock { language } => {
            let mut code = HtmlElement::new("code");
            if let Some(language) = language {
                code.set_attr("class", format!("language-{}", language));
            }
            plain("pre", node)
                .with_children(vec![code.with_children(vec![HtmlNode::text(node.text_content())]).into()])
        }
        NodeKind::Image { src, align } => image(src, *align, node),
        NodeKind::Container(presentation) => presented("div", presentation, node).with_children(children()),
        NodeKind::Run(presentation) => presented("span", presentation, node).with_children(children()),
        NodeKind::Element { tag } => plain(tag, node).with_children(children()),
    };

    vec![element.into()]
}

fn plain(tag: &str, node: &Node) -> HtmlElement {
    let mut el = HtmlElement::new(tag);
    el.attributes = node.attributes.clone();
    el
}

fn presented(tag: &str, presentation: &Presentation, node: &Node) -> HtmlElement {
    let mut el = HtmlElement::new(tag);

    if let Some(class) = presentation.class_attribute() {
        el.set_attr("class", class);
    }
    if !presentation.style.is_empty() {
        el.set_attr("style", presentation.style.serialize());
    }
    for (name, value) in &node.attributes {
        el.set_attr(name.clone(), value.clone());
    }

    el
}

/// Style that realizes an image alignment
pub fn image_alignment_style(align: Alignment) -> StyleMap {
    match align {
        Alignment::Left => StyleMap::new(),
        Alignment::Center => {
            StyleMap::parse("display: block; margin-left: auto; margin-right: auto")
        }
        Alignment::Right => StyleMap::parse("display: block; margin-left: auto; margin-right: 0"),
    }
}

fn image(src: &str, align: Alignment, node: &Node) -> HtmlElement {
    let mut el = HtmlElement::new("img").with_attr("src", src);

    for (name, value) in &node.attributes {
        if name != "style" {
            el.set_attr(name.clone(), value.clone());
        }
    }

    if align != Alignment::Left {
        el.set_attr("data-align", align.as_str());
    }

    let mut style = image_alignment_style(align);
    if let Some(own) = node.attributes.get("style") {
        style.cascade(&StyleMap::parse(own));
    }
    if !style.is_empty() {
        el.set_attr("style", style.serialize());
    }

    el
}
