//! # Platform Profiles
//!
//! An export target is described entirely by data: a per-tag default style
//! table, a font stack, a code theme and an optional background. The
//! pipeline itself never branches on the platform.

use folio_style::rem_to_px;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Monospace theme applied to rewritten code blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeTheme {
    /// Style of the outer `pre`
    pub container: String,
    /// Reset applied to the inner `code`
    pub inner: String,
}

impl Default for CodeTheme {
    fn default() -> Self {
        Self {
            container: "display: block; margin: 16px 0; padding: 16px; background-color: #1e293b; \
                        color: #e2e8f0; border-radius: 8px; \
                        font-family: Menlo, Monaco, Consolas, monospace; font-size: 13px; \
                        line-height: 1.6; white-space: pre-wrap; word-break: break-all; \
                        overflow-x: auto"
                .to_string(),
            inner: "display: block; color: inherit; background: none; \
                    background-color: transparent; border: none; padding: 0; \
                    font-family: inherit; font-size: inherit; white-space: inherit"
                .to_string(),
        }
    }
}

impl CodeTheme {
    /// Same theme with every `rem` length rewritten to pixels
    pub fn in_px(&self) -> CodeTheme {
        CodeTheme {
            container: rem_to_px(&self.container).into_owned(),
            inner: rem_to_px(&self.inner).into_owned(),
        }
    }
}

/// Page background. Absent fields are omitted from the shell, never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_repeat: Option<String>,
}

impl BackgroundDescriptor {
    /// Present declarations in shell order
    pub fn declarations(&self) -> Vec<(&'static str, &str)> {
        [
            ("background", &self.background),
            ("background-image", &self.background_image),
            ("background-color", &self.background_color),
            ("background-size", &self.background_size),
            ("background-repeat", &self.background_repeat),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations().is_empty()
    }
}

/// Export target description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProfile {
    pub name: String,
    /// Tag → canonical style string
    #[serde(default)]
    pub tag_styles: IndexMap<String, String>,
    pub font_family: String,
    #[serde(default)]
    pub code_theme: CodeTheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundDescriptor>,
}

const FONT_STACK: &str = "-apple-system, BlinkMacSystemFont, Helvetica Neue, PingFang SC, \
                          Hiragino Sans GB, Microsoft YaHei, Arial, sans-serif";

const WECHAT_TAG_STYLES: &[(&str, &str)] = &[
    ("p", "margin: 0 0 16px; font-size: 16px; line-height: 1.75; color: #333333; letter-spacing: 0.5px"),
    ("h1", "margin: 32px 0 16px; font-size: 24px; font-weight: bold; line-height: 1.4; color: #111111"),
    ("h2", "margin: 28px 0 14px; font-size: 20px; font-weight: bold; line-height: 1.4; color: #111111"),
    ("h3", "margin: 24px 0 12px; font-size: 18px; font-weight: bold; line-height: 1.4; color: #111111"),
    ("h4", "margin: 20px 0 10px; font-size: 16px; font-weight: bold; line-height: 1.4; color: #111111"),
    ("h5", "margin: 16px 0 8px; font-size: 15px; font-weight: bold; line-height: 1.4; color: #111111"),
    ("h6", "margin: 16px 0 8px; font-size: 14px; font-weight: bold; line-height: 1.4; color: #475569"),
    ("blockquote", "margin: 16px 0; padding: 12px 16px; border-left: 4px solid #e2e8f0; background-color: #f8fafc; color: #475569"),
    ("ul", "margin: 0 0 16px; padding-left: 24px; list-style-type: disc"),
    ("ol", "margin: 0 0 16px; padding-left: 24px; list-style-type: decimal"),
    ("li", "margin: 4px 0; line-height: 1.75"),
    ("hr", "margin: 24px 0; border: none; border-top: 1px solid #e2e8f0"),
    ("img", "max-width: 100%; height: auto"),
    ("a", "color: #2563eb; text-decoration: none; border-bottom: 1px solid #2563eb"),
    ("strong", "font-weight: bold"),
    ("b", "font-weight: bold"),
    ("em", "font-style: italic"),
    ("i", "font-style: italic"),
    ("code", "padding: 2px 4px; border-radius: 4px; background-color: #f1f5f9; color: #be123c; font-family: Menlo, Monaco, Consolas, monospace; font-size: 14px"),
    ("table", "width: 100%; margin: 16px 0; border-collapse: collapse"),
    ("th", "padding: 8px; border: 1px solid #e2e8f0; background-color: #f8fafc; font-weight: bold"),
    ("td", "padding: 8px; border: 1px solid #e2e8f0"),
];

const BLOG_TAG_STYLES: &[(&str, &str)] = &[
    ("p", "margin: 0 0 16px; line-height: 1.7"),
    ("h1", "margin: 32px 0 16px; font-size: 28px"),
    ("h2", "margin: 28px 0 14px; font-size: 22px"),
    ("h3", "margin: 24px 0 12px; font-size: 18px"),
    ("blockquote", "margin: 16px 0; padding-left: 16px; border-left: 4px solid #cbd5e1"),
    ("img", "max-width: 100%"),
];

fn table(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(tag, style)| (tag.to_string(), style.to_string()))
        .collect()
}

impl PlatformProfile {
    /// Restrictive renderer: full tag table
    pub fn wechat() -> Self {
        Self {
            name: "wechat".to_string(),
            tag_styles: table(WECHAT_TAG_STYLES),
            font_family: FONT_STACK.to_string(),
            code_theme: CodeTheme::default(),
            background: None,
        }
    }

    /// Permissive renderer: small table, no background
    pub fn blog() -> Self {
        Self {
            name: "blog".to_string(),
            tag_styles: table(BLOG_TAG_STYLES),
            font_family: "Georgia, Times New Roman, serif".to_string(),
            code_theme: CodeTheme::default(),
            background: None,
        }
    }

    /// Built-in profiles in display order
    pub fn builtin() -> Vec<PlatformProfile> {
        vec![Self::wechat(), Self::blog()]
    }

    pub fn by_name(name: &str) -> Option<PlatformProfile> {
        Self::builtin().into_iter().find(|p| p.name == name)
    }

    pub fn with_background(mut self, background: BackgroundDescriptor) -> Self {
        self.background = Some(background);
        self
    }

    /// Default style for a tag
    pub fn tag_style(&self, tag: &str) -> Option<&str> {
        self.tag_styles.get(tag).map(String::as_str)
    }
}

/// Named background presets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundCatalog {
    presets: IndexMap<String, BackgroundDescriptor>,
}

impl BackgroundCatalog {
    pub fn builtin() -> Self {
        let mut presets = IndexMap::new();

        presets.insert(
            "paper".to_string(),
            BackgroundDescriptor {
                background_color: Some("#fdfaf3".to_string()),
                ..Default::default()
            },
        );
        presets.insert(
            "grid".to_string(),
            BackgroundDescriptor {
                background_color: Some("#ffffff".to_string()),
                background_image: Some(
                    "linear-gradient(#f1f5f9 1px, transparent 1px), linear-gradient(90deg, #f1f5f9 1px, transparent 1px)"
                        .to_string(),
                ),
                background_size: Some("20px 20px".to_string()),
                ..Default::default()
            },
        );
        presets.insert(
            "dots".to_string(),
            BackgroundDescriptor {
                background_color: Some("#ffffff".to_string()),
                background_image: Some("radial-gradient(#e2e8f0 1px, transparent 1px)".to_string()),
                background_size: Some("16px 16px".to_string()),
                background_repeat: Some("repeat".to_string()),
                ..Default::default()
            },
        );
        presets.insert(
            "sunrise".to_string(),
            BackgroundDescriptor {
                background: Some("linear-gradient(180deg, #fff7ed 0%, #ffffff 100%)".to_string()),
                ..Default::default()
            },
        );

        Self { presets }
    }

    pub fn get(&self, name: &str) -> Option<&BackgroundDescriptor> {
        self.presets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BackgroundDescriptor)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_skip_absent_fields() {
        let descriptor = BackgroundDescriptor {
            background_color: Some("#fff".to_string()),
            background_image: Some("radial-gradient(#000, #fff)".to_string()),
            ..Default::default()
        };

        assert_eq!(
            descriptor.declarations(),
            vec![
                ("background-image", "radial-gradient(#000, #fff)"),
                ("background-color", "#fff"),
            ]
        );
    }

    #[test]
    fn test_profile_loads_from_camel_case_json() {
        let profile: PlatformProfile = serde_json::from_str(
            r##"{
                "name": "newsletter",
                "tagStyles": { "p": "margin: 0" },
                "fontFamily": "serif",
                "background": { "backgroundColor": "#fafafa" }
            }"##,
        )
        .unwrap();

        assert_eq!(profile.tag_style("p"), Some("margin: 0"));
        assert_eq!(profile.code_theme, CodeTheme::default());
        assert_eq!(
            profile.background.unwrap().background_color.as_deref(),
            Some("#fafafa")
        );
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(PlatformProfile::by_name("wechat").is_some());
        assert!(PlatformProfile::by_name("blog").unwrap().background.is_none());
        assert!(PlatformProfile::by_name("unknown").is_none());
        assert!(BackgroundCatalog::builtin().get("grid").is_some());
    }
}
