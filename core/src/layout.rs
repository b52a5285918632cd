//! Keyboard layout data model.
//!
//! A layout is an ordered list of rows, each an ordered list of keys. The
//! position of a key is significant: row `r`, key `k` of the active layout is
//! bound to on-screen row `r`, slot `k`. Five peer layouts make up a
//! [`LayoutSet`]; switching between them never nests or stacks.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::key::KeyDescriptor;

/// The five named layouts a keyboard switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Alpha,
    Shift,
    Caps,
    Numbers,
    Symbols,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 5] = [
        LayoutKind::Alpha,
        LayoutKind::Shift,
        LayoutKind::Caps,
        LayoutKind::Numbers,
        LayoutKind::Symbols,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Shift => "shift",
            Self::Caps => "caps",
            Self::Numbers => "numbers",
            Self::Symbols => "symbols",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyRow {
    #[serde(default)]
    pub keys: Vec<KeyDescriptor>,
}

impl KeyRow {
    pub fn new(keys: Vec<KeyDescriptor>) -> Self {
        Self { keys }
    }

    /// A row of value keys, one per character of `chars`.
    pub fn from_chars(chars: &str) -> Self {
        Self::new(chars.chars().map(|c| KeyDescriptor::value(c.to_string())).collect())
    }
}

/// A complete layout: a name used in diagnostics plus its rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rows: Vec<KeyRow>,
}

impl LayoutConfig {
    pub fn new(name: impl Into<String>, rows: Vec<KeyRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// The key at `row`/`slot`, if the layout defines one.
    pub fn key(&self, row: usize, slot: usize) -> Option<&KeyDescriptor> {
        self.rows.get(row)?.keys.get(slot)
    }

    /// The key bound to `row`/`slot`; missing entries resolve to an empty key.
    pub fn key_or_empty(&self, row: usize, slot: usize) -> KeyDescriptor {
        self.key(row, slot).cloned().unwrap_or_else(KeyDescriptor::empty)
    }

    /// Find the first key whose label equals `label`.
    pub fn find_label(&self, label: &str) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.keys
                .iter()
                .position(|k| !k.is_empty() && k.label == label)
                .map(|k| (r, k))
        })
    }

    /// Largest number of keys in any row.
    pub fn widest_row(&self) -> usize {
        self.rows.iter().map(|r| r.keys.len()).max().unwrap_or(0)
    }
}

/// The five layouts a keyboard switches between.
///
/// A layout left out of a file is empty: every slot is hidden while it is
/// active.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSet {
    pub alpha: LayoutConfig,
    pub shift: LayoutConfig,
    pub caps: LayoutConfig,
    pub numbers: LayoutConfig,
    pub symbols: LayoutConfig,
}

impl LayoutSet {
    pub fn get(&self, kind: LayoutKind) -> &LayoutConfig {
        match kind {
            LayoutKind::Alpha => &self.alpha,
            LayoutKind::Shift => &self.shift,
            LayoutKind::Caps => &self.caps,
            LayoutKind::Numbers => &self.numbers,
            LayoutKind::Symbols => &self.symbols,
        }
    }

    pub fn get_mut(&mut self, kind: LayoutKind) -> &mut LayoutConfig {
        match kind {
            LayoutKind::Alpha => &mut self.alpha,
            LayoutKind::Shift => &mut self.shift,
            LayoutKind::Caps => &mut self.caps,
            LayoutKind::Numbers => &mut self.numbers,
            LayoutKind::Symbols => &mut self.symbols,
        }
    }

    /// Iterate over `(kind, layout)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutKind, &LayoutConfig)> {
        LayoutKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    /// Number of rows and slots per row needed to show every layout.
    pub fn slot_grid(&self) -> Vec<usize> {
        let rows = self.iter().map(|(_, l)| l.rows.len()).max().unwrap_or(0);
        (0..rows)
            .map(|r| {
                self.iter()
                    .map(|(_, l)| l.rows.get(r).map_or(0, |row| row.keys.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Give unnamed layouts their kind's name.
    fn fill_names(mut self) -> Self {
        for kind in LayoutKind::ALL {
            let layout = self.get_mut(kind);
            if layout.name.is_empty() {
                layout.name = kind.as_str().to_string();
            }
        }
        self
    }

    /// Parse a layout set from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let set: LayoutSet = toml::from_str(content).context("invalid layout TOML")?;
        Ok(set.fill_names())
    }

    /// Parse a layout set from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let set: LayoutSet = serde_json::from_str(content).context("invalid layout JSON")?;
        Ok(set.fill_names())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a layout set from a `.toml` or `.json` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layouts from {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let set = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        set.with_context(|| format!("failed to parse {}", path.display()))
    }
}
