//! # HTML DOM
//!
//! A small owned HTML tree used at both ends of the pipeline:
//! document (de)serialization and the export transformer.
//!
//! Parsing is delegated to html5ever (through `scraper`), which builds a
//! best-effort tree from any input. Nodes the tree builder cannot place are
//! dropped by it; comments, doctypes and processing instructions are
//! dropped here.

use indexmap::IndexMap;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

/// HTML node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HtmlNode {
    Element(HtmlElement),
    Text { text: String },
}

/// HTML element with ordered attributes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HtmlElement {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<HtmlNode>,
}

impl HtmlNode {
    pub fn text(text: impl Into<String>) -> Self {
        HtmlNode::Text { text: text.into() }
    }

    pub fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            HtmlNode::Element(el) => Some(el),
            HtmlNode::Text { .. } => None,
        }
    }

    /// Concatenated descendant text
    pub fn text_content(&self) -> String {
        match self {
            HtmlNode::Text { text } => text.clone(),
            HtmlNode::Element(el) => el.text_content(),
        }
    }
}

impl From<HtmlElement> for HtmlNode {
    fn from(el: HtmlElement) -> Self {
        HtmlNode::Element(el)
    }
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<HtmlNode>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(HtmlNode::text_content).collect()
    }

    /// Class list split on whitespace
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }
}

/// Parse an HTML fragment permissively
pub fn parse_html(html: &str) -> Vec<HtmlNode> {
    let document = Html::parse_fragment(html);
    convert_children(document.root_element())
}

fn convert_children(parent: ElementRef<'_>) -> Vec<HtmlNode> {
    let mut nodes = Vec::new();

    for child in parent.children() {
        match child.value() {
            scraper::Node::Text(text) => {
                let text: &str = text;
                nodes.push(HtmlNode::text(text));
            }
            scraper::Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    nodes.push(HtmlNode::Element(convert_element(element)));
                }
            }
            _ => {}
        }
    }

    nodes
}

fn convert_element(element: ElementRef<'_>) -> HtmlElement {
    let value = element.value();
    HtmlElement {
        tag: value.name().to_ascii_lowercase(),
        attributes: value
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        children: convert_children(element),
    }
}

/// Serialize nodes back to HTML
pub fn to_html(nodes: &[HtmlNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text { text } => out.push_str(&escape_text(text)),
        HtmlNode::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &HtmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);

    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    if is_void(&el.tag) {
        out.push_str(" />");
        return;
    }

    out.push('>');

    if is_raw_text(&el.tag) {
        for child in &el.children {
            out.push_str(&child.text_content());
        }
    } else {
        for child in &el.children {
            write_node(child, out);
        }
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Visit every element depth-first, parents before children
pub fn walk_mut(nodes: &mut [HtmlNode], f: &mut impl FnMut(&mut HtmlElement)) {
    for node in nodes {
        if let HtmlNode::Element(el) = node {
            f(el);
            walk_mut(&mut el.children, f);
        }
    }
}

/// Visit every element depth-first without mutation
pub fn walk(nodes: &[HtmlNode], f: &mut impl FnMut(&HtmlElement)) {
    for node in nodes {
        if let HtmlNode::Element(el) = node {
            f(el);
            walk(&el.children, f);
        }
    }
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fragment() {
        let nodes = parse_html(r#"<p class="a" style="color: red">Hi <b>there</b></p>"#);
        assert_eq!(nodes.len(), 1);

        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.tag, "p");
        assert_eq!(p.attr("class"), Some("a"));
        assert_eq!(p.attr("style"), Some("color: red"));
        assert_eq!(p.text_content(), "Hi there");
    }

    #[test]
    fn test_attribute_order_is_preserved() {
        let nodes = parse_html(r#"<div style="x: 1" id="b" class="c"></div>"#);
        let div = nodes[0].as_element().unwrap();
        let names: Vec<_> = div.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["style", "id", "class"]);
    }

    #[test]
    fn test_comments_are_dropped() {
        let nodes = parse_html("<p>a<!-- hidden -->b</p>");
        assert_eq!(to_html(&nodes), "<p>ab</p>");
    }

    #[test]
    fn test_malformed_input_is_repaired() {
        let nodes = parse_html("<p><b>bold<i>both</p>tail");
        let html = to_html(&nodes);
        assert!(html.starts_with("<p><b>bold<i>both</i></b></p>"));
        assert!(html.contains("tail"));
    }

    #[test]
    fn test_round_trip_escaping() {
        let html = r#"<p title="a &quot;b&quot;">1 &lt; 2 &amp; 3</p><img src="x.png" />"#;
        assert_eq!(to_html(&parse_html(html)), html);
    }

    #[test]
    fn test_walk_mut_visits_nested() {
        let mut nodes = parse_html("<div><p><span>x</span></p></div>");
        let mut tags = Vec::new();
        walk_mut(&mut nodes, &mut |el| tags.push(el.tag.clone()));
        assert_eq!(tags, vec!["div", "p", "span"]);
    }
}
