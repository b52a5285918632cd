//! Focus tracking for the keyboard's edit target.
//!
//! `FocusTracker` replaces a process-wide "current target" with an explicit
//! object. Every mutation reports what changed so the owner can notify the
//! engine straight away instead of polling each frame.

use tracing::debug;

use crate::target::{same_target, SharedTarget};

/// Change reported by [`FocusTracker`] mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// A target became current where there was none
    Gained,
    /// The current target was replaced by a different one
    Retargeted,
    /// The current target was cleared
    Lost,
}

/// Records which text target, if any, the keyboard is editing.
#[derive(Default)]
pub struct FocusTracker {
    current: Option<SharedTarget>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The target that currently has focus.
    pub fn current(&self) -> Option<&SharedTarget> {
        self.current.as_ref()
    }

    pub fn has_target(&self) -> bool {
        self.current.is_some()
    }

    /// A text target was selected. Re-focusing the current target is a no-op.
    pub fn on_focus(&mut self, target: SharedTarget) -> Option<FocusChange> {
        let change = match &self.current {
            Some(current) if same_target(current, &target) => return None,
            Some(_) => FocusChange::Retargeted,
            None => FocusChange::Gained,
        };
        debug!(?change, "focus target updated");
        self.current = Some(target);
        Some(change)
    }

    /// Something was deselected. Only callers that own the
    /// "deselect clears focus" behaviour actually clear the target.
    pub fn on_blur(&mut self, clears_focus_on_blur: bool) -> Option<FocusChange> {
        if !clears_focus_on_blur {
            return None;
        }
        self.current.take().map(|_| {
            debug!("focus target cleared");
            FocusChange::Lost
        })
    }
}

/// A focusable part of the keyboard UI, such as a key button or the
/// keyboard background.
///
/// Selecting a region hands focus back to the target the keyboard is
/// editing, so pressing a key does not leave the text field unfocused.
/// Regions with `clears_focus_on_blur` unset never clear focus when
/// deselected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRegion {
    pub clears_focus_on_blur: bool,
}

impl FocusRegion {
    /// A region whose deselection clears focus (key buttons).
    pub const KEY: FocusRegion = FocusRegion {
        clears_focus_on_blur: true,
    };

    /// A region that keeps focus when deselected (keyboard background).
    pub const BACKGROUND: FocusRegion = FocusRegion {
        clears_focus_on_blur: false,
    };

    /// The region was selected while the keyboard edits `keyboard_target`.
    pub fn on_select(
        &self,
        focus: &mut FocusTracker,
        keyboard_target: Option<SharedTarget>,
    ) -> Option<FocusChange> {
        keyboard_target.and_then(|target| focus.on_focus(target))
    }

    /// The region was deselected.
    pub fn on_deselect(&self, focus: &mut FocusTracker) -> Option<FocusChange> {
        focus.on_blur(self.clears_focus_on_blur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{share, TextField};

    fn field() -> SharedTarget {
        share(TextField::new())
    }

    #[test]
    fn focus_is_idempotent() {
        let mut focus = FocusTracker::new();
        let a = field();
        assert_eq!(focus.on_focus(a.clone()), Some(FocusChange::Gained));
        assert_eq!(focus.on_focus(a.clone()), None);
        assert!(same_target(focus.current().unwrap(), &a));
    }

    #[test]
    fn focusing_another_target_retargets() {
        let mut focus = FocusTracker::new();
        focus.on_focus(field());
        assert_eq!(focus.on_focus(field()), Some(FocusChange::Retargeted));
    }

    #[test]
    fn blur_respects_clear_flag() {
        let mut focus = FocusTracker::new();
        focus.on_focus(field());

        assert_eq!(focus.on_blur(false), None);
        assert!(focus.has_target());

        assert_eq!(focus.on_blur(true), Some(FocusChange::Lost));
        assert!(!focus.has_target());

        assert_eq!(focus.on_blur(true), None);
    }

    #[test]
    fn selecting_a_region_restores_keyboard_target() {
        let mut focus = FocusTracker::new();
        let a = field();
        focus.on_focus(a.clone());

        assert_eq!(FocusRegion::KEY.on_deselect(&mut focus), Some(FocusChange::Lost));
        assert_eq!(
            FocusRegion::KEY.on_select(&mut focus, Some(a.clone())),
            Some(FocusChange::Gained)
        );
        assert!(same_target(focus.current().unwrap(), &a));

        assert_eq!(FocusRegion::KEY.on_select(&mut focus, None), None);
    }

    #[test]
    fn background_region_keeps_focus() {
        let mut focus = FocusTracker::new();
        focus.on_focus(field());
        assert_eq!(FocusRegion::BACKGROUND.on_deselect(&mut focus), None);
        assert!(focus.has_target());
    }
}
