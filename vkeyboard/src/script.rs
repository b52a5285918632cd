//! Key scripts: typed key sequences for the demo CLI and tests.
//!
//! A script is a whitespace-separated list of tokens:
//!
//! - `:name` presses the operation key `name` (`:shift`, `:space`, `:bksp`,
//!   `:123`, `:submit`, ...); `:bg` touches the keyboard background
//! - any other token presses one key per character, so `hello` is five keys
//! - a lone `:` is the colon key
//!
//! Keys are pressed through the slots of the active layout, the way a user
//! would tap them, so a letter missing from the current layout is not typed.

use anyhow::{bail, Result};
use tracing::warn;
use vkeyboard_core::{
    KeyDescriptor, KeyFunction, KeyOperation, KeyboardSession, LayoutBinder, LayoutConfig, SlotId,
};

/// One step of a key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stroke {
    Label(String),
    Operation(KeyOperation),
    Background,
}

/// What happened when a stroke was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// A bound slot was pressed
    Pressed(SlotId),
    /// No slot carries the operation; the key was evaluated directly
    Evaluated,
    /// The label is not on the active layout
    NotOnLayout,
}

/// Parse a key script.
pub fn parse_script(script: &str) -> Result<Vec<Stroke>> {
    let mut strokes = Vec::new();
    for token in script.split_whitespace() {
        match token.strip_prefix(':') {
            Some("") => strokes.push(Stroke::Label(":".to_string())),
            Some("bg") | Some("background") => strokes.push(Stroke::Background),
            Some(name) => match KeyOperation::from_name(name) {
                Some(KeyOperation::None) | None => bail!("unknown key operation ':{}'", name),
                Some(op) => strokes.push(Stroke::Operation(op)),
            },
            None => strokes.extend(token.chars().map(|c| Stroke::Label(c.to_string()))),
        }
    }
    Ok(strokes)
}

fn find_operation(layout: &LayoutConfig, op: KeyOperation) -> Option<SlotId> {
    layout.rows.iter().enumerate().find_map(|(r, row)| {
        row.keys
            .iter()
            .position(|k| !k.is_empty() && k.function == KeyFunction::Operation && k.operation == op)
            .map(|s| SlotId::new(r, s))
    })
}

/// Play one stroke against `session`.
///
/// A key the layout defines but the binder has no widget for counts as not
/// on the layout.
pub fn play<B: LayoutBinder>(session: &mut KeyboardSession<B>, stroke: &Stroke) -> StrokeOutcome {
    let keyboard = session.keyboard();
    let layout = keyboard.active_layout_config();
    let slot = match stroke {
        Stroke::Label(label) => layout.find_label(label).map(|(row, slot)| SlotId::new(row, slot)),
        Stroke::Operation(op) => find_operation(layout, *op),
        Stroke::Background => None,
    }
    .filter(|id| keyboard.bound_key(*id).is_some_and(|k| !k.is_empty()));

    if slot.is_none() {
        if let Stroke::Label(label) = stroke {
            warn!(%label, layout = %layout.name, "key not on active layout");
            return StrokeOutcome::NotOnLayout;
        }
    }

    match (slot, stroke) {
        (Some(id), _) => {
            session.press(id);
            StrokeOutcome::Pressed(id)
        }
        (None, Stroke::Operation(op)) => {
            session.evaluate_key(&KeyDescriptor::operation(format!("{:?}", op), *op));
            StrokeOutcome::Evaluated
        }
        (None, _) => {
            session.background_touch();
            StrokeOutcome::Evaluated
        }
    }
}

/// Play a whole script, returning each stroke's outcome.
pub fn play_all<B: LayoutBinder>(
    session: &mut KeyboardSession<B>,
    strokes: &[Stroke],
) -> Vec<StrokeOutcome> {
    strokes.iter().map(|s| play(session, s)).collect()
}
