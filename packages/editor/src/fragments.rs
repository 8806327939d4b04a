//! # Fragment Insertion
//!
//! Pre-authored decorative snippets spliced into the document. Catalog
//! content is curated, so the only check applied on insert is block/inline
//! placement.

use crate::{Document, EditorError, Mutation, MutationResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Splice anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InsertPosition {
    /// Inside `parent_id` before child `index` (clamped to the end)
    #[serde(rename_all = "camelCase")]
    Cursor { parent_id: String, index: usize },
    DocumentStart,
    DocumentEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentCategory {
    Decoration,
    Header,
    Footer,
}

impl FragmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentCategory::Decoration => "decoration",
            FragmentCategory::Header => "header",
            FragmentCategory::Footer => "footer",
        }
    }
}

impl std::fmt::Display for FragmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub category: FragmentCategory,
    pub html: String,
}

#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("Unknown fragment: {0}")]
    UnknownFragment(String),

    #[error("Invalid fragment catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}

/// Immutable fragment table keyed by id
#[derive(Debug, Clone, Default)]
pub struct FragmentCatalog {
    fragments: IndexMap<String, Fragment>,
}

const BUILTIN_FRAGMENTS: &[(&str, FragmentCategory, &str)] = &[
    (
        "divider-dots",
        FragmentCategory::Decoration,
        r#"<p style="text-align: center; color: #cbd5e1; letter-spacing: 8px">• • •</p>"#,
    ),
    (
        "divider-line",
        FragmentCategory::Decoration,
        r#"<hr style="border: none; border-top: 1px dashed #cbd5e1">"#,
    ),
    (
        "highlight-marker",
        FragmentCategory::Decoration,
        r#"<span style="background-color: #fef08a; padding: 2px 4px; border-radius: 4px">Highlight</span>"#,
    ),
    (
        "header-title-card",
        FragmentCategory::Header,
        r#"<div style="padding: 16px 24px; border-left: 4px solid #2563eb; background-color: #eff6ff"><p><span style="font-size: 20px; font-weight: bold">Title</span></p></div>"#,
    ),
    (
        "header-banner",
        FragmentCategory::Header,
        r#"<div style="padding: 24px; border-radius: 12px; background-color: #0f172a; color: #ffffff; text-align: center"><p><span style="font-size: 22px; font-weight: bold">Headline</span></p><p>Subtitle</p></div>"#,
    ),
    (
        "footer-thanks",
        FragmentCategory::Footer,
        r#"<div style="margin-top: 32px; padding: 16px; border-top: 1px solid #e2e8f0; text-align: center"><p><span style="color: #64748b; font-size: 14px">Thanks for reading.</span></p></div>"#,
    ),
    (
        "footer-signature",
        FragmentCategory::Footer,
        r#"<p><span style="color: #94a3b8; font-size: 13px">Written with Folio</span></p>"#,
    ),
];

impl FragmentCatalog {
    pub fn new(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        Self {
            fragments: fragments
                .into_iter()
                .map(|fragment| (fragment.id.clone(), fragment))
                .collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_FRAGMENTS.iter().map(|(id, category, html)| Fragment {
            id: id.to_string(),
            category: *category,
            html: html.to_string(),
        }))
    }

    /// Load a JSON array of fragments
    pub fn from_json(json: &str) -> Result<Self, FragmentError> {
        let fragments: Vec<Fragment> = serde_json::from_str(json)?;
        Ok(Self::new(fragments))
    }

    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    pub fn get(&self, id: &str) -> Result<&Fragment, FragmentError> {
        self.fragments
            .get(id)
            .ok_or_else(|| FragmentError::UnknownFragment(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.values()
    }

    pub fn by_category(&self, category: FragmentCategory) -> impl Iterator<Item = &Fragment> {
        self.iter().filter(move |fragment| fragment.category == category)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Splice a catalog fragment into `doc`. Returns the created node ids.
pub fn insert_fragment(
    doc: &mut Document,
    catalog: &FragmentCatalog,
    fragment_id: &str,
    position: InsertPosition,
) -> Result<MutationResult, EditorError> {
    let fragment = catalog.get(fragment_id)?;

    doc.apply(Mutation::InsertHtml {
        html: fragment.html.clone(),
        position,
    })
}
