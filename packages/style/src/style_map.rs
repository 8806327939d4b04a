//! # Style Map Codec
//!
//! Parses the free-form `style` attribute into an ordered map and back.
//!
//! ## Rules
//!
//! - Segments are split on top-level `;`, then on the first `:`
//! - Keys are trimmed and lowercased, values are trimmed
//! - Empty segments and segments without `:` are dropped
//! - Duplicate keys: last one wins
//! - Serialization joins `key: value` pairs with `; ` in insertion order

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a property name for storage and comparison
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Ordered property → value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap {
    entries: IndexMap<String, String>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a style string. Never fails; malformed segments are skipped.
    pub fn parse(input: &str) -> Self {
        let mut map = Self::new();

        for segment in split_declarations(input) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let Some((key, value)) = segment.split_once(':') else {
                tracing::trace!(segment, "dropping style segment without separator");
                continue;
            };

            let key = normalize_key(key);
            if key.is_empty() {
                tracing::trace!(segment, "dropping style segment without property name");
                continue;
            }

            map.set(key, value.trim());
        }

        map
    }

    /// Serialize back to `key: value; key: value`
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Set a property. An existing key keeps its position.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(normalize_key(key.as_ref()), value.into().trim().to_string());
    }

    /// Remove a property. Later entries shift up, so a re-insert lands at the end.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(&normalize_key(key))
    }

    /// Layer `other` on top of this map with CSS cascade semantics.
    ///
    /// Every incoming key is moved to the end, so a longhand declared after a
    /// shorthand keeps winning exactly as it would in a concatenated string.
    pub fn cascade(&mut self, other: &StyleMap) {
        for (key, value) in &other.entries {
            self.entries.shift_remove(key);
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Rewrite every value in place
    pub fn map_values(&mut self, mut f: impl FnMut(&str) -> String) {
        for value in self.entries.values_mut() {
            *value = f(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

/// Split on `;` outside of parentheses and quotes, so values such as
/// `url(data:image/png;base64,...)` survive intact.
fn split_declarations(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                segments.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&input[start..]);

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let map = StyleMap::parse("color: #000; font-size: 16px");
        assert_eq!(map.get("color"), Some("#000"));
        assert_eq!(map.get("font-size"), Some("16px"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_normalizes_keys_and_whitespace() {
        let a = StyleMap::parse("color:#000");
        let b = StyleMap::parse("  COLOR : #000 ;");
        assert_eq!(a, b);
        assert_eq!(b.get("Color"), Some("#000"));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let map = StyleMap::parse("color: red; color: blue");
        assert_eq!(map.get("color"), Some("blue"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_parse_drops_malformed_segments() {
        let map = StyleMap::parse("color red; ; :bare; padding: 4px;;");
        assert_eq!(map.serialize(), "padding: 4px");
    }

    #[test]
    fn test_parse_keeps_semicolons_inside_parens() {
        let map = StyleMap::parse("background-image: url(data:image/png;base64,AAA); color: red");
        assert_eq!(map.get("background-image"), Some("url(data:image/png;base64,AAA)"));
        assert_eq!(map.get("color"), Some("red"));
    }

    #[test]
    fn test_serialize_insertion_order() {
        let mut map = StyleMap::new();
        map.set("padding", "4px");
        map.set("color", "red");
        assert_eq!(map.serialize(), "padding: 4px; color: red");
    }

    #[test]
    fn test_reinsert_after_remove_moves_to_end() {
        let mut map = StyleMap::parse("color: red; padding: 4px; margin: 0");
        map.remove("color");
        map.set("color", "blue");
        assert_eq!(map.serialize(), "padding: 4px; margin: 0; color: blue");
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = StyleMap::parse("color: red; padding: 4px");
        map.set("color", "blue");
        assert_eq!(map.serialize(), "color: blue; padding: 4px");
    }

    #[test]
    fn test_cascade_moves_overwritten_keys_last() {
        let mut base = StyleMap::parse("margin-top: 0; margin: 8px; color: red");
        base.cascade(&StyleMap::parse("margin-top: 4px"));
        assert_eq!(base.serialize(), "margin: 8px; color: red; margin-top: 4px");
    }

    #[test]
    fn test_round_trip() {
        let maps = [
            StyleMap::parse("color: #333; background-color: #fff; padding: 2px 4px"),
            StyleMap::parse("display: block; text-align: center"),
            StyleMap::new(),
        ];

        for map in maps {
            assert_eq!(StyleMap::parse(&map.serialize()), map);
        }
    }

    #[test]
    fn test_serde_as_object() {
        let map = StyleMap::parse("color: red; padding: 4px");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"color":"red","padding":"4px"}"#);

        let back: StyleMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
