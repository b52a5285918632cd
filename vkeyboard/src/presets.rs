//! Built-in layout sets.
//!
//! Every preset fills all five layouts with the same four-row shape:
//!
//! - **Row 0-1**: letters, digits or symbols
//! - **Row 2**: a layout toggle, letters or punctuation, and backspace
//! - **Row 3**: layout switch, space, punctuation and return
//!
//! The shift layout inserts one capital and drops back to alpha; its toggle
//! key moves on to caps lock. Caps keeps capitals until its toggle returns
//! to alpha.

use vkeyboard_core::{KeyDescriptor, KeyOperation, KeyRow, LayoutConfig, LayoutSet};

/// Names accepted by [`preset_by_name`].
pub const PRESET_NAMES: &[&str] = &["qwerty", "azerty"];

/// Look up a preset by name (case-insensitive).
pub fn preset_by_name(name: &str) -> Option<LayoutSet> {
    match name.to_ascii_lowercase().as_str() {
        "qwerty" => Some(qwerty_layouts()),
        "azerty" => Some(azerty_layouts()),
        _ => None,
    }
}

/// US QWERTY layouts.
pub fn qwerty_layouts() -> LayoutSet {
    letter_layouts("qwerty", ["qwertyuiop", "asdfghjkl", "zxcvbnm"])
}

/// French AZERTY layouts.
pub fn azerty_layouts() -> LayoutSet {
    letter_layouts("azerty", ["azertyuiop", "qsdfghjklm", "wxcvbn"])
}

fn letter_layouts(name: &str, letters: [&str; 3]) -> LayoutSet {
    let upper = letters.map(str::to_uppercase);

    let alpha = LayoutConfig::new(
        format!("{}-alpha", name),
        vec![
            KeyRow::from_chars(letters[0]),
            KeyRow::from_chars(letters[1]),
            toggle_row(
                KeyDescriptor::operation("⇧", KeyOperation::Shift),
                value_keys(letters[2], false),
            ),
            bottom_row("123", KeyOperation::Numbers),
        ],
    );

    let shift = LayoutConfig::new(
        format!("{}-shift", name),
        vec![
            KeyRow::new(value_keys(&upper[0], true)),
            KeyRow::new(value_keys(&upper[1], true)),
            toggle_row(
                KeyDescriptor::operation("⇪", KeyOperation::Caps).with_alternate_color(),
                value_keys(&upper[2], true),
            ),
            bottom_row("123", KeyOperation::Numbers),
        ],
    );

    let caps = LayoutConfig::new(
        format!("{}-caps", name),
        vec![
            KeyRow::from_chars(&upper[0]),
            KeyRow::from_chars(&upper[1]),
            toggle_row(
                KeyDescriptor::operation("⇪", KeyOperation::Alpha)
                    .with_alternate_color()
                    .with_button_color(LOCK_COLOR),
                value_keys(&upper[2], false),
            ),
            bottom_row("123", KeyOperation::Numbers),
        ],
    );

    let numbers = LayoutConfig::new(
        format!("{}-numbers", name),
        vec![
            KeyRow::from_chars("1234567890"),
            KeyRow::new(value_keys("-/:;()$&@\"", false)),
            toggle_row(
                KeyDescriptor::operation("#+=", KeyOperation::Symbols).with_alternate_size(),
                value_keys(".,?!'", false),
            ),
            bottom_row("ABC", KeyOperation::Alpha),
        ],
    );

    let symbols = LayoutConfig::new(
        format!("{}-symbols", name),
        vec![
            KeyRow::new(value_keys("[]{}#%^*+=", false)),
            KeyRow::new(value_keys("_\\|~<>€£¥•", false)),
            toggle_row(
                KeyDescriptor::operation("123", KeyOperation::Numbers).with_alternate_size(),
                value_keys(".,?!'", false),
            ),
            bottom_row("ABC", KeyOperation::Alpha),
        ],
    );

    LayoutSet {
        alpha,
        shift,
        caps,
        numbers,
        symbols,
    }
}

const LOCK_COLOR: vkeyboard_core::Rgba = vkeyboard_core::Rgba::new(0.9, 0.9, 0.9, 1.0);

fn value_keys(chars: &str, reset_to_alpha: bool) -> Vec<KeyDescriptor> {
    chars
        .chars()
        .map(|c| {
            let key = KeyDescriptor::value(c.to_string());
            if reset_to_alpha {
                key.with_reset_to_alpha()
            } else {
                key
            }
        })
        .collect()
}

fn toggle_row(toggle: KeyDescriptor, keys: Vec<KeyDescriptor>) -> KeyRow {
    let mut row = Vec::with_capacity(keys.len() + 2);
    row.push(toggle.with_width(1.5));
    row.extend(keys);
    row.push(
        KeyDescriptor::operation("⌫", KeyOperation::Backspace)
            .with_width(1.5)
            .with_alternate_size(),
    );
    KeyRow::new(row)
}

// Shared by every layout, so `,` and `.` never reset a one-shot shift.
fn bottom_row(switch_label: &str, switch_to: KeyOperation) -> KeyRow {
    KeyRow::new(vec![
        KeyDescriptor::operation(switch_label, switch_to)
            .with_width(1.5)
            .with_alternate_size(),
        KeyDescriptor::operation("space", KeyOperation::Space).with_width(5.0),
        KeyDescriptor::value(","),
        KeyDescriptor::value("."),
        KeyDescriptor::operation("return", KeyOperation::Submit)
            .with_width(2.0)
            .with_alternate_size()
            .with_alternate_color(),
    ])
}
