//! # Folio Parser
//!
//! Article HTML ⇄ document tree.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ dom: permissive HTML parsing │
//! └──────────────────────────────┘
//!                ↓
//! ┌──────────────────────────────┐
//! │ parser: DOM → Document       │
//! │  - containers, runs, blocks  │
//! │  - placement repair          │
//! └──────────────────────────────┘
//!                ↓
//! ┌──────────────────────────────┐
//! │ serializer: Document → HTML  │
//! └──────────────────────────────┘
//! ```
//!
//! Parsing never fails. Malformed markup is repaired by the HTML tree
//! builder and content that cannot be placed is dropped.

pub mod ast;
pub mod dom;
pub mod id_generator;
pub mod parser;
pub mod serializer;

pub use ast::{
    breaks_inline_flow, is_block_tag, is_contextual_tag, is_model_tag, merge_text_nodes,
    ContentRule, Document, Node, NodeKind, Placement, Presentation,
};
pub use dom::{parse_html, to_html, HtmlElement, HtmlNode};
pub use id_generator::{document_seed, IDGenerator};
pub use parser::{parse_document, parse_fragment, ParseContext};
pub use serializer::{image_alignment_style, serialize_document, serialize_nodes, to_dom};
