use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use vkeyboard_core::{Config, LayoutSet};

use crate::presets::{preset_by_name, PRESET_NAMES};

/// Keyboard profile that extends the core styling `Config`.
///
/// A profile carries:
/// - All styling options from `vkeyboard_core::Config` (flattened via serde)
/// - The name of a built-in preset
/// - An optional layout file that replaces the preset
///
/// # Example
///
/// ```rust
/// use vkeyboard::KeyboardProfile;
///
/// let profile = KeyboardProfile::from_toml_str("preset = \"azerty\"\nkey_unit_width = 120.0").unwrap();
/// assert_eq!(profile.preset, "azerty");
/// let config = profile.into_base();
/// assert_eq!(config.key_unit_width, 120.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyboardProfile {
    /// Base styling fields (key width, colours, font sizes)
    #[serde(flatten)]
    pub base: Config,

    /// Built-in layout set to use when `layouts_path` is unset
    pub preset: String,

    /// TOML or JSON layout set overriding the preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layouts_path: Option<PathBuf>,
}

impl Default for KeyboardProfile {
    fn default() -> Self {
        Self {
            base: Config::default(),
            preset: "qwerty".to_string(),
            layouts_path: None,
        }
    }
}

impl KeyboardProfile {
    /// Convert this profile into the base config for use with `Keyboard::with_config()`
    pub fn into_base(self) -> Config {
        self.base
    }

    pub fn base(&self) -> &Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Config {
        &mut self.base
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse profile {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolve the layout set this profile names.
    ///
    /// A relative `layouts_path` is taken as-is (relative to the working
    /// directory).
    pub fn layouts(&self) -> Result<LayoutSet> {
        if let Some(path) = &self.layouts_path {
            return LayoutSet::load(path);
        }
        preset_by_name(&self.preset).ok_or_else(|| {
            anyhow!(
                "unknown preset '{}' (available: {})",
                self.preset,
                PRESET_NAMES.join(", ")
            )
        })
    }
}
