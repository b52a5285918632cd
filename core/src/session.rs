//! Keyboard session: focus tracking wired to the key-edit engine.
//!
//! Hosts forward their focus notifications here instead of checking the
//! focused widget every frame. Notifications only update the tracker; the
//! engine is reconciled once per input dispatch by [`KeyboardSession::flush`],
//! so transient focus hand-offs inside one dispatch (tapping a key briefly
//! takes focus away from the text field) never close and reopen the
//! keyboard.

use tracing::debug;

use crate::binder::{LayoutBinder, SlotId};
use crate::engine::{Keyboard, KeyboardEvent};
use crate::focus::{FocusChange, FocusRegion, FocusTracker};
use crate::key::KeyDescriptor;
use crate::target::SharedTarget;

/// Focus tracker and keyboard engine behind one API.
pub struct KeyboardSession<B: LayoutBinder> {
    focus: FocusTracker,
    keyboard: Keyboard<B>,
    /// Set when the tracker reported a change since the last flush
    dirty: bool,
}

impl<B: LayoutBinder> KeyboardSession<B> {
    pub fn new(keyboard: Keyboard<B>) -> Self {
        Self {
            focus: FocusTracker::new(),
            keyboard,
            dirty: false,
        }
    }

    pub fn focus_tracker(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn keyboard(&self) -> &Keyboard<B> {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard<B> {
        &mut self.keyboard
    }

    pub fn is_open(&self) -> bool {
        self.keyboard.is_open()
    }

    /// Whether focus notifications are waiting for [`flush`](Self::flush).
    pub fn has_pending_focus(&self) -> bool {
        self.dirty
    }

    /// A text field gained focus.
    pub fn on_focus(&mut self, target: SharedTarget) {
        let change = self.focus.on_focus(target);
        self.note(change);
    }

    /// The focused text field lost focus.
    pub fn on_blur(&mut self) {
        let change = self.focus.on_blur(true);
        self.note(change);
    }

    /// A keyboard region (key button, background) was selected.
    pub fn region_selected(&mut self, region: FocusRegion) {
        let change = region.on_select(&mut self.focus, self.keyboard.target());
        self.note(change);
    }

    /// A keyboard region was deselected.
    pub fn region_deselected(&mut self, region: FocusRegion) {
        let change = region.on_deselect(&mut self.focus);
        self.note(change);
    }

    /// Reconcile the engine with the focus notifications received since the
    /// last flush. Does nothing when none changed the tracker.
    pub fn flush(&mut self) -> Option<KeyboardEvent> {
        if !std::mem::take(&mut self.dirty) {
            return None;
        }
        self.keyboard.sync_focus(&self.focus)
    }

    /// Unconditional reconcile, for hosts that cannot deliver focus
    /// notifications and check once per frame instead.
    pub fn poll(&mut self) -> Option<KeyboardEvent> {
        self.dirty = false;
        self.keyboard.sync_focus(&self.focus)
    }

    /// Press the key bound to `slot`.
    pub fn press(&mut self, slot: SlotId) {
        self.keyboard.press(slot);
        self.hand_focus_back();
    }

    /// Evaluate a key that is not bound to any slot.
    pub fn evaluate_key(&mut self, key: &KeyDescriptor) {
        self.keyboard.evaluate_key(key);
        self.hand_focus_back();
    }

    pub fn background_touch(&mut self) {
        self.keyboard.background_touch();
        self.hand_focus_back();
    }

    /// Drain the engine's pending notifications.
    pub fn take_events(&mut self) -> Vec<KeyboardEvent> {
        self.keyboard.take_events()
    }

    /// Evaluation ends by refocusing the target; record that in the tracker.
    fn hand_focus_back(&mut self) {
        if let Some(target) = self.keyboard.target() {
            let change = self.focus.on_focus(target);
            self.note(change);
        }
    }

    fn note(&mut self, change: Option<FocusChange>) {
        if let Some(change) = change {
            debug!(?change, "focus notification");
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::SlotGrid;
    use crate::key::KeyOperation;
    use crate::layout::{KeyRow, LayoutConfig, LayoutKind, LayoutSet};
    use crate::target::{share, TextField, TextTarget};

    fn session() -> KeyboardSession<SlotGrid> {
        let mut layouts = LayoutSet::default();
        layouts.alpha = LayoutConfig::new(
            "alpha",
            vec![
                KeyRow::from_chars("ab"),
                KeyRow::new(vec![KeyDescriptor::operation("123", KeyOperation::Numbers)]),
            ],
        );
        layouts.numbers = LayoutConfig::new("numbers", vec![KeyRow::from_chars("12")]);
        KeyboardSession::new(Keyboard::new(layouts, SlotGrid::new(&[2, 1])))
    }

    #[test]
    fn focus_opens_and_blur_closes() {
        let mut session = session();
        let field = share(TextField::new());

        session.on_focus(field.clone());
        assert!(session.has_pending_focus());
        assert_eq!(
            session.flush(),
            Some(KeyboardEvent::Opened { layout: LayoutKind::Alpha })
        );
        assert!(session.is_open());
        assert_eq!(session.flush(), None);

        session.on_blur();
        assert_eq!(session.flush(), Some(KeyboardEvent::Closed));
        assert!(!session.is_open());
    }

    #[test]
    fn refocusing_same_field_is_not_a_change() {
        let mut session = session();
        let field = share(TextField::new());
        session.on_focus(field.clone());
        session.flush();

        session.on_focus(field);
        assert!(!session.has_pending_focus());
        assert_eq!(session.flush(), None);
    }

    #[test]
    fn key_tap_does_not_close_keyboard() {
        let mut session = session();
        let field = share(TextField::new());
        session.on_focus(field.clone());
        session.flush();
        session.take_events();

        // The key button takes focus, is pressed, then hands focus back.
        session.on_blur();
        session.region_selected(FocusRegion::KEY);
        session.press(SlotId::new(0, 1));
        session.region_deselected(FocusRegion::KEY);
        session.on_focus(field.clone());

        assert_eq!(session.flush(), None);
        assert!(session.is_open());
        assert_eq!(field.borrow().content(), "b");
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn layout_survives_key_tap() {
        let mut session = session();
        let field = share(TextField::new());
        session.on_focus(field.clone());
        session.flush();

        session.on_blur();
        session.region_selected(FocusRegion::KEY);
        session.press(SlotId::new(1, 0));
        session.flush();
        assert_eq!(session.keyboard().active_layout(), LayoutKind::Numbers);

        session.press(SlotId::new(0, 0));
        session.flush();
        assert_eq!(field.borrow().content(), "1");
    }

    #[test]
    fn background_deselect_keeps_focus() {
        let mut session = session();
        session.on_focus(share(TextField::with_content("x")));
        session.flush();

        session.region_selected(FocusRegion::BACKGROUND);
        session.background_touch();
        session.region_deselected(FocusRegion::BACKGROUND);
        assert_eq!(session.flush(), None);
        assert!(session.is_open());
    }

    #[test]
    fn switching_fields_reopens_on_alpha() {
        let mut session = session();
        session.on_focus(share(TextField::new()));
        session.flush();
        session.evaluate_key(&KeyDescriptor::operation("123", KeyOperation::Numbers));
        session.take_events();

        let second = share(TextField::new());
        session.on_focus(second.clone());
        assert_eq!(
            session.flush(),
            Some(KeyboardEvent::Opened { layout: LayoutKind::Alpha })
        );
        assert_eq!(session.keyboard().active_layout(), LayoutKind::Alpha);

        session.press(SlotId::new(0, 0));
        assert_eq!(second.borrow().content(), "a");
    }

    #[test]
    fn poll_reconciles_without_notifications() {
        let mut session = session();
        assert_eq!(session.poll(), None);
        session.on_focus(share(TextField::new()));
        assert!(session.poll().is_some());
        assert_eq!(session.poll(), None);
    }

    #[test]
    fn keys_before_open_are_ignored() {
        let mut session = session();
        let field = share(TextField::new());
        session.on_focus(field.clone());
        session.press(SlotId::new(0, 0));
        session.evaluate_key(&KeyDescriptor::value("z"));
        assert_eq!(field.borrow().content(), "");
    }
}
