//! # vkeyboard
//!
//! Ready-made layouts, keyboard profiles and key scripts built on
//! vkeyboard-core.

pub mod config;
pub mod engine;
pub mod presets;
pub mod script;

// Re-export the engine API from core
pub use vkeyboard_core::*;

pub use config::KeyboardProfile;
pub use engine::{
    create_keyboard, create_keyboard_qwerty, create_keyboard_with_binder,
    create_session_from_profile, slot_grid_for,
};
pub use presets::{azerty_layouts, preset_by_name, qwerty_layouts, PRESET_NAMES};
pub use script::{parse_script, play, play_all, Stroke, StrokeOutcome};
