//! Key descriptors and the actions they map to.
//!
//! A `KeyDescriptor` is the authored description of one slot on the keyboard:
//! its label, what pressing it does, and a handful of styling hints. The
//! engine never dispatches on the raw `function`/`operation` pair directly;
//! it first derives a [`KeyAction`] and matches on that.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutKind;

/// Label used by the synthetic key sent for background touches.
pub const BACKGROUND_LABEL: &str = "Background";

/// Whether a key inserts its label or performs an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFunction {
    #[default]
    Value,
    Operation,
}

/// Operation performed by a key whose function is [`KeyFunction::Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOperation {
    /// Placeholder used for background touches
    #[default]
    None,
    Shift,
    Caps,
    Numbers,
    Symbols,
    Alpha,
    Submit,
    Space,
    Backspace,
}

impl KeyOperation {
    /// Parse an operation name as typed on a command line (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "shift" => Self::Shift,
            "caps" => Self::Caps,
            "numbers" | "123" => Self::Numbers,
            "symbols" | "#+=" => Self::Symbols,
            "alpha" | "abc" => Self::Alpha,
            "submit" | "enter" | "return" => Self::Submit,
            "space" => Self::Space,
            "backspace" | "bksp" => Self::Backspace,
            _ => return None,
        };
        Some(op)
    }
}

/// RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black; on a key it means "use the default button colour".
    pub const CLEAR: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::CLEAR
    }
}

/// Text margin of a key label: left, top, right, bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin(pub [f32; 4]);

/// Immutable description of one logical key.
///
/// An empty `label` marks an inactive slot; evaluating such a key does nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyDescriptor {
    pub label: String,
    pub function: KeyFunction,
    pub operation: KeyOperation,
    pub width_multiplier: f32,
    /// Button colour override; [`Rgba::CLEAR`] keeps the configured default
    pub alternate_button_color: Rgba,
    pub alternate_color: bool,
    pub alternate_size: bool,
    /// After inserting, switch back to the alpha layout (one-shot shift)
    pub reset_to_alpha: bool,
    pub custom_margin: Margin,
}

impl Default for KeyDescriptor {
    fn default() -> Self {
        Self {
            label: String::new(),
            function: KeyFunction::Value,
            operation: KeyOperation::None,
            width_multiplier: 1.0,
            alternate_button_color: Rgba::CLEAR,
            alternate_color: false,
            alternate_size: false,
            reset_to_alpha: false,
            custom_margin: Margin::default(),
        }
    }
}

impl KeyDescriptor {
    /// The descriptor bound to UI slots that have no layout entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A key that inserts `label`.
    pub fn value(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// A key that performs `operation`, displayed as `label`.
    pub fn operation(label: impl Into<String>, operation: KeyOperation) -> Self {
        Self {
            label: label.into(),
            function: KeyFunction::Operation,
            operation,
            ..Self::default()
        }
    }

    /// The synthetic key evaluated when the keyboard background is touched.
    pub fn background() -> Self {
        Self::operation(BACKGROUND_LABEL, KeyOperation::None)
    }

    pub fn with_width(mut self, width_multiplier: f32) -> Self {
        self.width_multiplier = width_multiplier;
        self
    }

    pub fn with_reset_to_alpha(mut self) -> Self {
        self.reset_to_alpha = true;
        self
    }

    pub fn with_alternate_color(mut self) -> Self {
        self.alternate_color = true;
        self
    }

    pub fn with_alternate_size(mut self) -> Self {
        self.alternate_size = true;
        self
    }

    pub fn with_button_color(mut self, color: Rgba) -> Self {
        self.alternate_button_color = color;
        self
    }

    pub fn with_margin(mut self, margin: [f32; 4]) -> Self {
        self.custom_margin = Margin(margin);
        self
    }

    /// Inactive slots have an empty label and are hidden.
    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    /// What pressing this key does.
    pub fn action(&self) -> KeyAction<'_> {
        match self.function {
            KeyFunction::Value => KeyAction::Insert(&self.label),
            KeyFunction::Operation => match self.operation {
                KeyOperation::Shift => KeyAction::SwitchLayout(LayoutKind::Shift),
                KeyOperation::Caps => KeyAction::SwitchLayout(LayoutKind::Caps),
                KeyOperation::Numbers => KeyAction::SwitchLayout(LayoutKind::Numbers),
                KeyOperation::Symbols => KeyAction::SwitchLayout(LayoutKind::Symbols),
                KeyOperation::Alpha => KeyAction::SwitchLayout(LayoutKind::Alpha),
                KeyOperation::Space => KeyAction::Space,
                KeyOperation::Submit => KeyAction::Submit,
                KeyOperation::Backspace => KeyAction::Backspace,
                KeyOperation::None => KeyAction::NoOp,
            },
        }
    }
}

/// Effect of a key press, derived from a [`KeyDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction<'a> {
    /// Insert literal text at the edit point
    Insert(&'a str),
    /// Make another layout active
    SwitchLayout(LayoutKind),
    Space,
    /// Line break on multiline targets, submit callback otherwise
    Submit,
    Backspace,
    NoOp,
}
