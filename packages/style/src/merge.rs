//! # Run Style Merge Engine
//!
//! Applies partial updates to a run's [`StyleMap`].
//!
//! ## Semantics
//!
//! - Each update either sets a property or clears it
//! - Clear sentinels: no value, a blank string, or `transparent` on a fill colour
//! - Clearing `background-color` also clears `padding` and `border-radius`,
//!   which are only ever set together with it by the highlight tool
//! - An empty result means the run mark must go away ([`MergeOutcome::Unmark`])

use crate::length::{format_px, parse_px};
use crate::style_map::{normalize_key, StyleMap};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Property whose removal drags its companions along
pub const HIGHLIGHT_PROPERTY: &str = "background-color";

/// Properties set together with a highlight
pub const HIGHLIGHT_COMPANIONS: [&str; 2] = ["padding", "border-radius"];

/// Properties for which `transparent` means "no fill"
const FILL_PROPERTIES: [&str; 2] = ["background-color", "background"];

pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;
pub const FONT_SIZE_STEP_PX: f64 = 2.0;
pub const MIN_FONT_SIZE_PX: f64 = 10.0;

/// Ordered set of property updates. `None` clears the property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleUpdates {
    entries: IndexMap<String, Option<String>>,
}

impl StyleUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(normalize_key(key), Some(value.into()));
        self
    }

    pub fn clear(mut self, key: &str) -> Self {
        self.entries.insert(normalize_key(key), None);
        self
    }

    /// Push a raw update as the UI delivers it (`None` or a possibly-sentinel string)
    pub fn push(&mut self, key: &str, value: Option<String>) {
        self.entries.insert(normalize_key(key), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of merging updates into a run style
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Run keeps its mark with this style
    Styled(StyleMap),

    /// Style became empty; the run must be unwrapped into plain text
    Unmark,
}

impl MergeOutcome {
    pub fn is_unmark(&self) -> bool {
        matches!(self, MergeOutcome::Unmark)
    }

    /// The resulting map (empty for `Unmark`)
    pub fn into_style(self) -> StyleMap {
        match self {
            MergeOutcome::Styled(style) => style,
            MergeOutcome::Unmark => StyleMap::new(),
        }
    }
}

/// Whether `value` means "remove this property"
pub fn is_clear_sentinel(key: &str, value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => true,
        Some(v) => {
            v.eq_ignore_ascii_case("transparent")
                && FILL_PROPERTIES.contains(&normalize_key(key).as_str())
        }
    }
}

/// Apply `updates` with plain set/clear semantics and no companion coupling
pub fn apply_style_updates(current: &StyleMap, updates: &StyleUpdates) -> StyleMap {
    let mut style = current.clone();

    for (key, value) in updates.iter() {
        match value {
            Some(value) if !is_clear_sentinel(key, Some(value)) => style.set(key, value),
            _ => {
                style.remove(key);
            }
        }
    }

    style
}

/// Apply `updates` to `current` and decide whether the run mark survives
pub fn apply_run_style(current: &StyleMap, updates: &StyleUpdates) -> MergeOutcome {
    let mut style = current.clone();

    for (key, value) in updates.iter() {
        if is_clear_sentinel(key, value) {
            style.remove(key);
            if key == HIGHLIGHT_PROPERTY {
                for companion in HIGHLIGHT_COMPANIONS {
                    style.remove(companion);
                }
            }
        } else if let Some(value) = value {
            style.set(key, value);
        }
    }

    if style.is_empty() {
        MergeOutcome::Unmark
    } else {
        MergeOutcome::Styled(style)
    }
}

/// Horizontal alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// Updates that align an inline run.
///
/// Centering an inline run only works once it is a block, so center/right
/// set `display: block` alongside `text-align`; left restores default flow by
/// dropping both.
pub fn alignment_updates(align: Alignment) -> StyleUpdates {
    match align {
        Alignment::Left => StyleUpdates::new().clear("display").clear("text-align"),
        Alignment::Center | Alignment::Right => StyleUpdates::new()
            .set("display", "block")
            .set("text-align", align.as_str()),
    }
}

/// Direction for font-size stepping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSizeStep {
    Up,
    Down,
}

/// Updates that step `font-size` by 2px, never going below 10px
pub fn font_size_updates(current: &StyleMap, step: FontSizeStep) -> StyleUpdates {
    let size = current
        .get("font-size")
        .and_then(parse_px)
        .unwrap_or(DEFAULT_FONT_SIZE_PX);

    let next = match step {
        FontSizeStep::Up => size + FONT_SIZE_STEP_PX,
        FontSizeStep::Down => size - FONT_SIZE_STEP_PX,
    };

    let next = next.round().max(MIN_FONT_SIZE_PX);
    StyleUpdates::new().set("font-size", format_px(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_overwrite() {
        let current = StyleMap::parse("color: red");
        let outcome = apply_run_style(
            &current,
            &StyleUpdates::new().set("color", "blue").set("font-weight", "bold"),
        );

        assert_eq!(
            outcome.into_style().serialize(),
            "color: blue; font-weight: bold"
        );
    }

    #[test]
    fn test_clear_highlight_removes_companions() {
        let current =
            StyleMap::parse("color: #111; background-color: #fef08a; padding: 2px 4px; border-radius: 4px");
        let outcome = apply_run_style(&current, &StyleUpdates::new().clear("background-color"));

        assert_eq!(outcome.into_style().serialize(), "color: #111");
    }

    #[test]
    fn test_transparent_clears_fill_only() {
        let current = StyleMap::parse("color: red; background-color: yellow; padding: 2px");

        let mut updates = StyleUpdates::new();
        updates.push("background-color", Some("transparent".to_string()));
        let style = apply_run_style(&current, &updates).into_style();
        assert_eq!(style.serialize(), "color: red");

        let mut updates = StyleUpdates::new();
        updates.push("color", Some("transparent".to_string()));
        let style = apply_run_style(&current, &updates).into_style();
        assert_eq!(style.get("color"), Some("transparent"));
    }

    #[test]
    fn test_clearing_other_keys_keeps_companions() {
        let current = StyleMap::parse("color: red; padding: 2px; border-radius: 4px");
        let style = apply_run_style(&current, &StyleUpdates::new().set("color", "")).into_style();
        assert_eq!(style.serialize(), "padding: 2px; border-radius: 4px");
    }

    #[test]
    fn test_plain_updates_keep_companions() {
        let current = StyleMap::parse("padding: 24px; background-color: #f8fafc");
        let style = apply_style_updates(&current, &StyleUpdates::new().clear("background-color"));
        assert_eq!(style.serialize(), "padding: 24px");
    }

    #[test]
    fn test_empty_result_unmarks() {
        let current = StyleMap::parse("color: red");
        let outcome = apply_run_style(&current, &StyleUpdates::new().clear("color"));
        assert!(outcome.is_unmark());
    }

    #[test]
    fn test_center_then_left_restores_flow() {
        let centered =
            apply_run_style(&StyleMap::new(), &alignment_updates(Alignment::Center)).into_style();
        assert_eq!(centered.serialize(), "display: block; text-align: center");

        let outcome = apply_run_style(&centered, &alignment_updates(Alignment::Left));
        assert!(outcome.is_unmark());
    }

    #[test]
    fn test_font_size_defaults_to_sixteen() {
        let updates = font_size_updates(&StyleMap::new(), FontSizeStep::Up);
        let style = apply_run_style(&StyleMap::new(), &updates).into_style();
        assert_eq!(style.get("font-size"), Some("18px"));
    }

    #[test]
    fn test_font_size_floor() {
        let current = StyleMap::parse("font-size: 11px");
        let style = apply_run_style(&current, &font_size_updates(&current, FontSizeStep::Down))
            .into_style();
        assert_eq!(style.get("font-size"), Some("10px"));

        let style = apply_run_style(&style, &font_size_updates(&style, FontSizeStep::Down))
            .into_style();
        assert_eq!(style.get("font-size"), Some("10px"));
    }

    #[test]
    fn test_font_size_reads_rem() {
        let current = StyleMap::parse("font-size: 1.5rem");
        let updates = font_size_updates(&current, FontSizeStep::Down);
        assert_eq!(
            apply_run_style(&current, &updates).into_style().get("font-size"),
            Some("22px")
        );
    }
}
