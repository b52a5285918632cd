use thiserror::Error;

/// Failure while binding a layout onto the keyboard's widgets.
///
/// The engine logs these at the layout-switch boundary; they never reach key
/// evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("no widget for row {row}, slot {slot}")]
    MissingWidget { row: usize, slot: usize },

    #[error("no widget for row {row}")]
    MissingRow { row: usize },

    #[error("invalid key '{label}' at row {row}, slot {slot}: {reason}")]
    InvalidKey {
        row: usize,
        slot: usize,
        label: String,
        reason: String,
    },

    #[error("widget error: {0}")]
    Widget(String),
}
