//! Factory functions for ready-to-use keyboards.
//!
//! The in-memory [`SlotGrid`] binder is sized from the layout set so every
//! key of every layout has a slot. Hosts with their own widgets use
//! [`create_keyboard_with_binder`].

use anyhow::Result;
use tracing::debug;
use vkeyboard_core::{Config, Keyboard, KeyboardSession, LayoutBinder, LayoutSet, SlotGrid};

use crate::config::KeyboardProfile;
use crate::presets::qwerty_layouts;

/// Grid with enough rows and slots to show every layout in `layouts`.
pub fn slot_grid_for(layouts: &LayoutSet) -> SlotGrid {
    SlotGrid::new(&layouts.slot_grid())
}

/// Keyboard over an in-memory grid sized for `layouts`.
pub fn create_keyboard(layouts: LayoutSet, config: Config) -> Keyboard<SlotGrid> {
    let grid = slot_grid_for(&layouts);
    Keyboard::with_config(layouts, config, grid)
}

/// Keyboard over a host-provided binder.
pub fn create_keyboard_with_binder<B: LayoutBinder>(
    layouts: LayoutSet,
    config: Config,
    binder: B,
) -> Keyboard<B> {
    Keyboard::with_config(layouts, config, binder)
}

/// QWERTY keyboard with default styling.
pub fn create_keyboard_qwerty() -> Keyboard<SlotGrid> {
    create_keyboard(qwerty_layouts(), Config::default())
}

/// Session for the layouts and styling a profile names.
pub fn create_session_from_profile(profile: &KeyboardProfile) -> Result<KeyboardSession<SlotGrid>> {
    let layouts = profile.layouts()?;
    debug!(alpha = %layouts.alpha.name, "creating keyboard session from profile");
    Ok(KeyboardSession::new(create_keyboard(layouts, profile.base().clone())))
}
