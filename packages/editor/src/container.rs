//! # Container Lifecycle
//!
//! Drives the "wrap selection in a styled box" panel.
//!
//! ## States
//!
//! ```text
//! NoContainer ──ensure──▶ Configuring ──close_panel──▶ Wrapped
//!                          │    ▲                         │
//!                          │    └────────ensure───────────┘
//!                          └──────remove──────▶ Removed ◀─remove
//! ```
//!
//! `Removed` is terminal for that container; `ensure_container` starts over
//! with a fresh one.

use crate::mutations::AttributePatch;
use crate::{Document, EditorError, Mutation};
use folio_parser::{ContentRule, Document as ASTDocument, Presentation};
use folio_style::{parse_px, StyleMap, StyleUpdates};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Style of a freshly wrapped container
pub const DEFAULT_CONTAINER_STYLE: &str =
    "padding: 24px; border-radius: 12px; border: 2px solid #f1f5f9; background-color: #f8fafc";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContainerError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: &'static str, action: &'static str },

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("Selection spans blocks with different parents")]
    SelectionSpansParents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerPreset {
    Default,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    NoContainer,
    Configuring {
        container_id: String,
        preset: ContainerPreset,
    },
    Wrapped {
        container_id: String,
        preset: ContainerPreset,
    },
    Removed,
}

impl ContainerState {
    pub fn name(&self) -> &'static str {
        match self {
            ContainerState::NoContainer => "no container",
            ContainerState::Configuring { .. } => "configuring",
            ContainerState::Wrapped { .. } => "wrapped",
            ContainerState::Removed => "removed",
        }
    }

    pub fn container_id(&self) -> Option<&str> {
        match self {
            ContainerState::Configuring { container_id, .. }
            | ContainerState::Wrapped { container_id, .. } => Some(container_id),
            ContainerState::NoContainer | ContainerState::Removed => None,
        }
    }
}

/// Padding presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    None,
    Compact,
    Cozy,
    Comfortable,
    Spacious,
}

impl Spacing {
    const ALL: [Spacing; 5] = [
        Spacing::None,
        Spacing::Compact,
        Spacing::Cozy,
        Spacing::Comfortable,
        Spacing::Spacious,
    ];

    pub fn px(&self) -> u32 {
        match self {
            Spacing::None => 0,
            Spacing::Compact => 12,
            Spacing::Cozy => 16,
            Spacing::Comfortable => 24,
            Spacing::Spacious => 32,
        }
    }

    pub fn from_px(px: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| f64::from(s.px()) == px)
    }
}

/// Corner radius presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radius {
    None,
    Small,
    Medium,
    Large,
    Pill,
}

impl Radius {
    const ALL: [Radius; 5] = [
        Radius::None,
        Radius::Small,
        Radius::Medium,
        Radius::Large,
        Radius::Pill,
    ];

    pub fn px(&self) -> u32 {
        match self {
            Radius::None => 0,
            Radius::Small => 4,
            Radius::Medium => 8,
            Radius::Large => 12,
            Radius::Pill => 24,
        }
    }

    pub fn from_px(px: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|r| f64::from(r.px()) == px)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    None,
    Color(String),
}

/// One panel control change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerUpdate {
    Padding(Spacing),
    Radius(Radius),
    BorderWidth(u32),
    BorderColor(String),
    Fill(Fill),
}

/// Panel state. Border width and colour are tracked separately and
/// recombined into one `border` declaration. `None` padding or radius means
/// the container carries a value that matches no preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDraft {
    pub padding: Option<Spacing>,
    pub radius: Option<Radius>,
    pub border_width: u32,
    pub border_color: String,
    pub fill: Fill,
}

impl Default for ContainerDraft {
    fn default() -> Self {
        Self {
            padding: Some(Spacing::Comfortable),
            radius: Some(Radius::Large),
            border_width: 2,
            border_color: "#f1f5f9".to_string(),
            fill: Fill::Color("#f8fafc".to_string()),
        }
    }
}

impl ContainerDraft {
    /// Seed from an existing container style. An absent border keeps the
    /// default width and colour for the first border control change.
    pub fn from_style(style: &StyleMap) -> Self {
        let mut draft = Self {
            padding: style
                .get("padding")
                .map_or(Some(Spacing::None), |value| parse_px(value).and_then(Spacing::from_px)),
            radius: style
                .get("border-radius")
                .map_or(Some(Radius::None), |value| parse_px(value).and_then(Radius::from_px)),
            ..Self::default()
        };

        if let Some(border) = style.get("border") {
            if border.trim().eq_ignore_ascii_case("none") {
                draft.border_width = 0;
            } else {
                let mut parts = border.split_whitespace();
                if let Some(width) = parts.next().and_then(parse_px) {
                    draft.border_width = width.round().max(0.0) as u32;
                }
                if let Some(color) = parts.filter(|part| !is_border_style(part)).last() {
                    draft.border_color = color.to_string();
                }
            }
        }
        draft.fill = match style.get("background-color") {
            Some(color) => Fill::Color(color.to_string()),
            None => Fill::None,
        };

        draft
    }

    pub fn apply(&mut self, update: ContainerUpdate) {
        match update {
            ContainerUpdate::Padding(padding) => self.padding = Some(padding),
            ContainerUpdate::Radius(radius) => self.radius = Some(radius),
            ContainerUpdate::BorderWidth(width) => self.border_width = width,
            ContainerUpdate::BorderColor(color) => self.border_color = color,
            ContainerUpdate::Fill(fill) => self.fill = fill,
        }
    }

    pub fn border(&self) -> String {
        if self.border_width == 0 {
            "none".to_string()
        } else {
            format!("{}px solid {}", self.border_width, self.border_color)
        }
    }
}

impl ContainerUpdate {
    /// Style updates for the one property this control owns, read from a
    /// draft that already has the update applied
    pub fn to_updates(&self, draft: &ContainerDraft) -> StyleUpdates {
        let updates = StyleUpdates::new();
        match self {
            ContainerUpdate::Padding(padding) => {
                updates.set("padding", format!("{}px", padding.px()))
            }
            ContainerUpdate::Radius(radius) => {
                updates.set("border-radius", format!("{}px", radius.px()))
            }
            ContainerUpdate::BorderWidth(_) | ContainerUpdate::BorderColor(_) => {
                updates.set("border", draft.border())
            }
            ContainerUpdate::Fill(Fill::Color(color)) => {
                updates.set("background-color", color.as_str())
            }
            ContainerUpdate::Fill(Fill::None) => updates.clear("background-color"),
        }
    }
}

fn is_border_style(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "none" | "hidden" | "dotted" | "dashed" | "solid" | "double" | "groove" | "ridge" | "inset"
            | "outset"
    )
}

/// Container panel state machine
#[derive(Debug)]
pub struct ContainerManager {
    state: ContainerState,
    draft: ContainerDraft,
}

impl ContainerManager {
    pub fn new() -> Self {
        Self {
            state: ContainerState::NoContainer,
            draft: ContainerDraft::default(),
        }
    }

    pub fn state(&self) -> &ContainerState {
        &self.state
    }

    pub fn draft(&self) -> &ContainerDraft {
        &self.draft
    }

    /// Open the panel on the selection's container, wrapping one if needed.
    /// Returns the container id.
    pub fn ensure_container(
        &mut self,
        doc: &mut Document,
        selection: &[String],
    ) -> Result<String, EditorError> {
        let first = selection.first().ok_or(ContainerError::EmptySelection)?;

        if let Some(container) = doc.ast().enclosing_container(first) {
            let presentation = container.kind.presentation().cloned().unwrap_or_default();
            let container_id = container.id.clone();
            let preset = if presentation.style == StyleMap::parse(DEFAULT_CONTAINER_STYLE) {
                ContainerPreset::Default
            } else {
                ContainerPreset::Custom
            };

            self.draft = ContainerDraft::from_style(&presentation.style);
            self.transition(ContainerState::Configuring {
                container_id: container_id.clone(),
                preset,
            });
            return Ok(container_id);
        }

        let blocks = selected_blocks(doc.ast(), selection)?;
        let result = doc.apply(Mutation::WrapInContainer {
            node_ids: blocks,
            presentation: Presentation::new(StyleMap::parse(DEFAULT_CONTAINER_STYLE)),
        })?;

        let container_id = result
            .created
            .first()
            .cloned()
            .ok_or_else(|| crate::MutationError::InvalidStructure("wrap created no container".to_string()))?;

        self.draft = ContainerDraft::default();
        self.transition(ContainerState::Configuring {
            container_id: container_id.clone(),
            preset: ContainerPreset::Default,
        });
        Ok(container_id)
    }

    /// Apply one panel control to the open container
    pub fn update_container_style(
        &mut self,
        doc: &mut Document,
        update: ContainerUpdate,
    ) -> Result<(), EditorError> {
        let ContainerState::Configuring { container_id, .. } = &self.state else {
            return Err(self.invalid("update the container style").into());
        };
        let container_id = container_id.clone();

        let mut draft = self.draft.clone();
        draft.apply(update.clone());

        doc.apply(Mutation::UpdateAttributes {
            node_id: container_id.clone(),
            patch: AttributePatch::new().style(update.to_updates(&draft)),
        })?;

        self.draft = draft;
        self.state = ContainerState::Configuring {
            container_id,
            preset: ContainerPreset::Custom,
        };
        Ok(())
    }

    /// Configuring → Wrapped
    pub fn close_panel(&mut self) -> Result<(), ContainerError> {
        match &self.state {
            ContainerState::Configuring { container_id, preset } => {
                let next = ContainerState::Wrapped {
                    container_id: container_id.clone(),
                    preset: *preset,
                };
                self.transition(next);
                Ok(())
            }
            _ => Err(self.invalid("close the panel")),
        }
    }

    /// Lift the container's children and finish
    pub fn remove_container(&mut self, doc: &mut Document) -> Result<(), EditorError> {
        let container_id = match &self.state {
            ContainerState::Configuring { container_id, .. }
            | ContainerState::Wrapped { container_id, .. } => container_id.clone(),
            _ => return Err(self.invalid("remove the container").into()),
        };

        doc.apply(Mutation::LiftContainer { container_id })?;
        self.transition(ContainerState::Removed);
        Ok(())
    }

    fn transition(&mut self, next: ContainerState) {
        info!(from = self.state.name(), to = next.name(), container = ?next.container_id(), "Container transition");
        self.state = next;
    }

    fn invalid(&self, action: &'static str) -> ContainerError {
        ContainerError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}

impl Default for ContainerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Nearest block-level node (child of a block parent) for each selected id
fn selected_blocks(ast: &ASTDocument, selection: &[String]) -> Result<Vec<String>, EditorError> {
    let mut blocks: Vec<String> = Vec::new();
    let mut parent_id: Option<String> = None;

    for id in selection {
        let path = ast
            .root
            .path_to(id)
            .ok_or_else(|| crate::MutationError::NodeNotFound(id.clone()))?;

        let (parent, block) = path
            .windows(2)
            .rev()
            .find(|pair| pair[0].kind.content_rule() == ContentRule::Blocks)
            .map(|pair| (pair[0], pair[1]))
            .ok_or(ContainerError::EmptySelection)?;

        if parent_id.as_deref().is_some_and(|existing| existing != parent.id) {
            return Err(ContainerError::SelectionSpansParents.into());
        }
        parent_id = Some(parent.id.clone());

        if !blocks.contains(&block.id) {
            blocks.push(block.id.clone());
        }
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_style::apply_style_updates;

    #[test]
    fn test_draft_from_default_style() {
        let draft = ContainerDraft::from_style(&StyleMap::parse(DEFAULT_CONTAINER_STYLE));
        assert_eq!(draft, ContainerDraft::default());
    }

    #[test]
    fn test_draft_border_rebuild() {
        let mut draft = ContainerDraft::default();
        draft.apply(ContainerUpdate::BorderColor("#ff0000".to_string()));
        assert_eq!(draft.border(), "2px solid #ff0000");

        draft.apply(ContainerUpdate::BorderWidth(0));
        assert_eq!(draft.border(), "none");

        draft.apply(ContainerUpdate::BorderWidth(3));
        assert_eq!(draft.border(), "3px solid #ff0000");
    }

    #[test]
    fn test_draft_reads_custom_style() {
        let draft = ContainerDraft::from_style(&StyleMap::parse(
            "padding: 16px; border-radius: 4px; border: none",
        ));
        assert_eq!(draft.padding, Some(Spacing::Cozy));
        assert_eq!(draft.radius, Some(Radius::Small));
        assert_eq!(draft.border_width, 0);
        assert_eq!(draft.fill, Fill::None);
    }

    #[test]
    fn test_draft_keeps_off_preset_values_unset() {
        let draft = ContainerDraft::from_style(&StyleMap::parse(
            "padding: 10px; border: 1px dashed #cccccc",
        ));
        assert_eq!(draft.padding, None);
        assert_eq!(draft.radius, Some(Radius::None));
        assert_eq!(draft.border_width, 1);
        assert_eq!(draft.border_color, "#cccccc");
    }

    #[test]
    fn test_update_touches_one_property() {
        let mut draft = ContainerDraft::default();
        let update = ContainerUpdate::BorderWidth(4);
        draft.apply(update.clone());

        let style = apply_style_updates(&StyleMap::parse("padding: 10px"), &update.to_updates(&draft));
        assert_eq!(style.serialize(), "padding: 10px; border: 4px solid #f1f5f9");
    }

    #[test]
    fn test_close_panel_requires_configuring() {
        let mut manager = ContainerManager::new();
        assert_eq!(
            manager.close_panel(),
            Err(ContainerError::InvalidTransition {
                state: "no container",
                action: "close the panel",
            })
        );
    }

    #[test]
    fn test_remove_requires_container() {
        let mut manager = ContainerManager::new();
        let mut doc = Document::from_html("a.html", "<p>x</p>");
        assert!(matches!(
            manager.remove_container(&mut doc),
            Err(EditorError::Container(ContainerError::InvalidTransition { .. }))
        ));
    }
}
