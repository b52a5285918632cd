//! Binding layouts onto on-screen key widgets.
//!
//! The presentation layer implements [`LayoutBinder`] over its own widget
//! tree. The engine walks the binder's grid of rows and slots, resolves each
//! slot's key and style, and hands the result to [`LayoutBinder::bind`].
//! [`SlotGrid`] is an in-memory binder for tests and the demo CLI.

use std::fmt;

use ahash::AHashMap;

use crate::error::BindError;
use crate::key::{KeyDescriptor, Margin, Rgba};
use crate::Config;

/// Position of a key widget: row index and slot index within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    pub row: usize,
    pub slot: usize,
}

impl SlotId {
    pub const fn new(row: usize, slot: usize) -> Self {
        Self { row, slot }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.slot)
    }
}

/// Visual attributes resolved for one key widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyStyle {
    pub width: f32,
    pub text_color: Rgba,
    pub font_size: f32,
    pub button_color: Rgba,
    pub margin: Margin,
}

impl KeyStyle {
    /// Resolve a key's styling hints against the keyboard configuration.
    pub fn resolve(key: &KeyDescriptor, config: &Config) -> Result<Self, String> {
        if !key.width_multiplier.is_finite() || key.width_multiplier < 0.0 {
            return Err(format!("width multiplier {} out of range", key.width_multiplier));
        }
        Ok(Self {
            width: config.key_unit_width * key.width_multiplier,
            text_color: if key.alternate_color {
                config.alternate_text_color
            } else {
                config.normal_text_color
            },
            font_size: if key.alternate_size {
                config.alternate_font_size
            } else {
                config.normal_font_size
            },
            button_color: if key.alternate_button_color.is_clear() {
                config.default_button_color
            } else {
                key.alternate_button_color
            },
            margin: key.custom_margin,
        })
    }
}

/// What a widget receives when a layout is bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundKey {
    pub key: KeyDescriptor,
    pub style: KeyStyle,
}

impl BoundKey {
    /// Slots with an empty label are hidden.
    pub fn visible(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Presentation-side grid of key widgets.
pub trait LayoutBinder {
    /// Number of key rows the UI provides.
    fn row_count(&self) -> usize;

    /// Number of key widgets in `row`.
    fn slot_count(&self, row: usize) -> Result<usize, BindError>;

    /// Show `bound` on the widget at `slot`, replacing whatever it showed.
    fn bind(&mut self, slot: SlotId, bound: &BoundKey) -> Result<(), BindError>;
}

/// In-memory grid of key widgets.
#[derive(Debug, Clone, Default)]
pub struct SlotGrid {
    rows: Vec<usize>,
    bindings: AHashMap<SlotId, BoundKey>,
}

impl SlotGrid {
    /// A grid with `rows[r]` slots in row `r`.
    pub fn new(rows: &[usize]) -> Self {
        Self {
            rows: rows.to_vec(),
            bindings: AHashMap::new(),
        }
    }

    pub fn binding(&self, slot: SlotId) -> Option<&BoundKey> {
        self.bindings.get(&slot)
    }

    /// Labels of the visible keys in `row`, in slot order.
    pub fn visible_labels(&self, row: usize) -> Vec<&str> {
        let slots = self.rows.get(row).copied().unwrap_or(0);
        (0..slots)
            .filter_map(|slot| self.bindings.get(&SlotId::new(row, slot)))
            .filter(|b| b.visible())
            .map(|b| b.key.label.as_str())
            .collect()
    }

    /// Number of bound widgets, visible or not.
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Plain-text picture of the grid, one line per row, with slot indices.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (row, &slots) in self.rows.iter().enumerate() {
            let cells: Vec<String> = (0..slots)
                .filter_map(|slot| {
                    let b = self.bindings.get(&SlotId::new(row, slot))?;
                    b.visible().then(|| format!("[{}:{}]", slot, display_label(&b.key.label)))
                })
                .collect();
            out.push_str(&format!("{}| {}\n", row, cells.join(" ")));
        }
        out
    }
}

fn display_label(label: &str) -> String {
    match label {
        " " => "␣".to_string(),
        "\n" => "⏎".to_string(),
        other => other.to_string(),
    }
}

impl LayoutBinder for SlotGrid {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn slot_count(&self, row: usize) -> Result<usize, BindError> {
        self.rows.get(row).copied().ok_or(BindError::MissingRow { row })
    }

    fn bind(&mut self, slot: SlotId, bound: &BoundKey) -> Result<(), BindError> {
        match self.rows.get(slot.row) {
            Some(&slots) if slot.slot < slots => {
                self.bindings.insert(slot, bound.clone());
                Ok(())
            }
            _ => Err(BindError::MissingWidget {
                row: slot.row,
                slot: slot.slot,
            }),
        }
    }
}
