//! vkeyboard-core
//!
//! Key-evaluation and text-editing engine for an on-screen keyboard.
//!
//! The engine tracks which text target has focus and which layout is active,
//! and turns logical key presses into edits on the target's content, caret
//! and selection. Rendering is left to the host, which implements
//! [`LayoutBinder`] over its own widgets.
//!
//! Public API:
//! - `Keyboard` - The key-edit state machine
//! - `KeyboardSession` - Focus tracker and engine wired together
//! - `KeyDescriptor` / `LayoutConfig` / `LayoutSet` - Layout data
//! - `TextTarget` - Host-owned text buffer the keyboard edits
//! - `LayoutBinder` - Host-side widget grid
//! - `Config` - Key styling constants
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod key;
pub use key::{KeyAction, KeyDescriptor, KeyFunction, KeyOperation, Margin, Rgba, BACKGROUND_LABEL};

pub mod layout;
pub use layout::{KeyRow, LayoutConfig, LayoutKind, LayoutSet};

pub mod target;
pub use target::{same_target, share, SharedTarget, TextField, TextTarget};

pub mod edit;
pub use edit::{apply_edit, Edit, EditOutcome};

pub mod focus;
pub use focus::{FocusChange, FocusRegion, FocusTracker};

pub mod error;
pub use error::BindError;

pub mod binder;
pub use binder::{BoundKey, KeyStyle, LayoutBinder, SlotGrid, SlotId};

pub mod engine;
pub use engine::{Keyboard, KeyboardEvent};

pub mod session;
pub use session::KeyboardSession;

/// Styling constants applied when a layout is bound.
///
/// Keys carry only relative hints (width multiplier, "alternate" colour and
/// size flags); this config supplies the absolute values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Width of a key with multiplier 1.0
    pub key_unit_width: f32,
    /// Button colour for keys without a colour override
    pub default_button_color: Rgba,
    pub normal_text_color: Rgba,
    pub alternate_text_color: Rgba,
    pub normal_font_size: f32,
    pub alternate_font_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_unit_width: 175.0,
            default_button_color: Rgba::new(0.703, 0.703, 0.703, 1.0),
            normal_text_color: Rgba::WHITE,
            alternate_text_color: Rgba::BLUE,
            normal_font_size: 72.0,
            alternate_font_size: 60.0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
