use anyhow::{anyhow, Result};
use folio_compiler_html::{BackgroundCatalog, PlatformProfile};
use folio_editor::FragmentCatalog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Profile used when `--profile` is not given
    #[serde(default = "default_profile")]
    pub default_profile: String,

    /// Named profiles layered over a built-in one
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub profiles: IndexMap<String, ProfileOverride>,

    /// JSON fragment catalog replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment_catalog: Option<String>,

    /// Export output directory
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

fn default_profile() -> String {
    "wechat".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverride {
    /// Built-in profile to start from (defaults to the override's own name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Per-tag styles replacing the base table's entries
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tag_styles: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Background preset name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve a profile name through the overrides
    pub fn profile(&self, name: &str) -> Result<PlatformProfile> {
        let layer = self.profiles.get(name);
        let base = layer.and_then(|l| l.extends.as_deref()).unwrap_or(name);

        let mut profile =
            PlatformProfile::by_name(base).ok_or_else(|| anyhow!("Unknown profile: {}", base))?;

        if let Some(layer) = layer {
            profile.name = name.to_string();
            for (tag, style) in &layer.tag_styles {
                profile.tag_styles.insert(tag.clone(), style.clone());
            }
            if let Some(font_family) = &layer.font_family {
                profile.font_family = font_family.clone();
            }
            if let Some(preset) = &layer.background {
                profile = profile.with_background(background(preset)?);
            }
        }

        Ok(profile)
    }

    /// Fragment catalog for this project
    pub fn fragments(&self, cwd: &str) -> Result<FragmentCatalog> {
        match &self.fragment_catalog {
            Some(path) => Ok(FragmentCatalog::load(&PathBuf::from(cwd).join(path))?),
            None => Ok(FragmentCatalog::builtin()),
        }
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: default_profile(),
            profiles: IndexMap::new(),
            fragment_catalog: None,
            out_dir: default_out_dir(),
        }
    }
}

/// Look up a built-in background preset
pub fn background(name: &str) -> Result<folio_compiler_html::BackgroundDescriptor> {
    BackgroundCatalog::builtin()
        .get(name)
        .cloned()
        .ok_or_else(|| anyhow!("Unknown background preset: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "defaultProfile": "newsletter",
            "profiles": {
                "newsletter": {
                    "extends": "blog",
                    "tagStyles": { "p": "margin: 0 0 12px" },
                    "background": "paper"
                }
            },
            "fragmentCatalog": "fragments.json",
            "outDir": "public"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_profile, "newsletter");
        assert_eq!(config.fragment_catalog, Some("fragments.json".to_string()));
        assert_eq!(config.out_dir, "public");
        assert_eq!(config.profiles["newsletter"].extends.as_deref(), Some("blog"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_profile, "wechat");
        assert_eq!(config.out_dir, "dist");
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_override_layers_on_base_profile() {
        let mut config = Config::default();
        config.profiles.insert(
            "newsletter".to_string(),
            ProfileOverride {
                extends: Some("blog".to_string()),
                tag_styles: IndexMap::from([("p".to_string(), "margin: 0".to_string())]),
                font_family: Some("Inter, sans-serif".to_string()),
                background: Some("paper".to_string()),
            },
        );

        let profile = config.profile("newsletter").unwrap();
        assert_eq!(profile.name, "newsletter");
        assert_eq!(profile.tag_style("p"), Some("margin: 0"));
        assert_eq!(profile.font_family, "Inter, sans-serif");
        assert!(profile.background.is_some());
    }

    #[test]
    fn test_unknown_profile_errors() {
        let config = Config::default();
        assert!(config.profile("nowhere").is_err());
        assert!(config.profile("blog").is_ok());
    }
}
