//! Key-edit engine.
//!
//! `Keyboard` owns the layout set, the active layout and the slot table, and
//! turns key presses into edits on the focused [`TextTarget`]. Presentation
//! lives behind a [`LayoutBinder`]; the engine only tells it which key and
//! style each slot shows.
//!
//! # Example
//!
//! ```
//! use vkeyboard_core::{
//!     share, FocusTracker, KeyDescriptor, KeyRow, Keyboard, LayoutConfig, LayoutSet, SlotGrid,
//!     TextField, TextTarget,
//! };
//!
//! let mut layouts = LayoutSet::default();
//! layouts.alpha = LayoutConfig::new("alpha", vec![KeyRow::from_chars("abc")]);
//!
//! let mut keyboard = Keyboard::new(layouts, SlotGrid::new(&[3]));
//! let mut focus = FocusTracker::new();
//! let field = share(TextField::new());
//! focus.on_focus(field.clone());
//! keyboard.sync_focus(&focus);
//!
//! keyboard.evaluate_key(&KeyDescriptor::value("b"));
//! assert_eq!(field.borrow().content(), "b");
//! ```

use tracing::{debug, error, warn};

use ahash::AHashMap;

use crate::binder::{BoundKey, KeyStyle, LayoutBinder, SlotId};
use crate::edit::{apply_edit, Edit};
use crate::error::BindError;
use crate::focus::FocusTracker;
use crate::key::{KeyAction, KeyDescriptor};
use crate::layout::{LayoutConfig, LayoutKind, LayoutSet};
use crate::target::{same_target, SharedTarget};
use crate::Config;

/// Notifications for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// A target gained focus; the keyboard should be shown with `layout`
    Opened { layout: LayoutKind },
    /// Focus was lost; the keyboard should be hidden
    Closed,
    /// The active layout was switched and rebound
    LayoutChanged { layout: LayoutKind },
    /// A single-line target's submit callback was invoked
    Submitted,
}

/// The key-edit state machine.
pub struct Keyboard<B: LayoutBinder> {
    layouts: LayoutSet,
    config: Config,
    binder: B,
    active: LayoutKind,
    /// Target the keyboard is editing; follows the focus tracker on sync
    target: Option<SharedTarget>,
    /// Key currently bound to each slot; a press evaluates exactly this key
    slots: AHashMap<SlotId, KeyDescriptor>,
    events: Vec<KeyboardEvent>,
    last_bind_error: Option<BindError>,
}

impl<B: LayoutBinder> Keyboard<B> {
    /// Create a keyboard with the default style configuration.
    pub fn new(layouts: LayoutSet, binder: B) -> Self {
        Self::with_config(layouts, Config::default(), binder)
    }

    pub fn with_config(layouts: LayoutSet, config: Config, binder: B) -> Self {
        Self {
            layouts,
            config,
            binder,
            active: LayoutKind::Alpha,
            target: None,
            slots: AHashMap::new(),
            events: Vec::new(),
            last_bind_error: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layouts(&self) -> &LayoutSet {
        &self.layouts
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    pub fn binder_mut(&mut self) -> &mut B {
        &mut self.binder
    }

    pub fn active_layout(&self) -> LayoutKind {
        self.active
    }

    pub fn active_layout_config(&self) -> &LayoutConfig {
        self.layouts.get(self.active)
    }

    /// The target being edited, if the keyboard is open.
    pub fn target(&self) -> Option<SharedTarget> {
        self.target.clone()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Key bound to `slot` by the last layout switch.
    pub fn bound_key(&self, slot: SlotId) -> Option<&KeyDescriptor> {
        self.slots.get(&slot)
    }

    /// Error from the most recent layout bind, if it failed.
    pub fn last_bind_error(&self) -> Option<&BindError> {
        self.last_bind_error.as_ref()
    }

    /// Drain pending notifications.
    pub fn take_events(&mut self) -> Vec<KeyboardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reconcile the keyboard with the tracker's current target.
    ///
    /// A newly focused target opens the keyboard on the alpha layout; losing
    /// the target closes it. Calling this again without a focus change does
    /// nothing.
    pub fn sync_focus(&mut self, focus: &FocusTracker) -> Option<KeyboardEvent> {
        let event = match focus.current() {
            Some(live) => {
                if self.target.as_ref().is_some_and(|t| same_target(t, live)) {
                    return None;
                }
                self.target = Some(live.clone());
                self.bind_layout(LayoutKind::Alpha, false);
                KeyboardEvent::Opened {
                    layout: LayoutKind::Alpha,
                }
            }
            None => {
                self.target.take()?;
                KeyboardEvent::Closed
            }
        };
        debug!(?event, "keyboard focus transition");
        self.events.push(event);
        Some(event)
    }

    /// Evaluate one key against the current target.
    ///
    /// Does nothing without a target or for keys with an empty label.
    pub fn evaluate_key(&mut self, key: &KeyDescriptor) {
        let Some(target) = self.target.clone() else {
            return;
        };
        if key.is_empty() {
            return;
        }

        match key.action() {
            KeyAction::Insert(text) => {
                apply_to_target(&target, Edit::Insert(text));
                if key.reset_to_alpha {
                    self.set_active_layout(LayoutKind::Alpha, true);
                }
            }
            KeyAction::SwitchLayout(kind) => self.set_active_layout(kind, true),
            KeyAction::Space => apply_to_target(&target, Edit::Insert(" ")),
            KeyAction::Submit => {
                let multiline = target.borrow().is_multiline();
                if multiline {
                    apply_to_target(&target, Edit::Insert("\n"));
                } else {
                    target.borrow_mut().submit();
                    self.events.push(KeyboardEvent::Submitted);
                }
            }
            KeyAction::Backspace => apply_to_target(&target, Edit::Backspace),
            KeyAction::NoOp => refresh_target(&target),
        }

        refocus(&target);
    }

    /// Evaluate whatever key is bound to `slot`.
    pub fn press(&mut self, slot: SlotId) {
        let Some(key) = self.slots.get(&slot).cloned() else {
            warn!(%slot, "press on unbound slot ignored");
            return;
        };
        self.evaluate_key(&key);
    }

    /// Touch on the keyboard background: keeps the target focused.
    pub fn background_touch(&mut self) {
        self.evaluate_key(&KeyDescriptor::background());
    }

    /// Make `kind` the active layout and rebind every slot.
    ///
    /// With `refresh_target` set, the target's text and caret/selection are
    /// re-applied after a successful bind. Bind failures are logged and kept
    /// in [`last_bind_error`](Self::last_bind_error); they never propagate.
    pub fn set_active_layout(&mut self, kind: LayoutKind, refresh_target: bool) {
        self.bind_layout(kind, refresh_target);
        self.events.push(KeyboardEvent::LayoutChanged { layout: kind });
    }

    fn bind_layout(&mut self, kind: LayoutKind, refresh: bool) {
        self.active = kind;
        match self.bind_active() {
            Ok(()) => {
                debug!(layout = %self.active_layout_config().name, "keyboard layout bound");
                self.last_bind_error = None;
                if refresh {
                    if let Some(target) = &self.target {
                        refresh_target(target);
                    }
                }
            }
            Err(err) => {
                error!(
                    layout = %self.active_layout_config().name,
                    error = %err,
                    "unable to load keyboard layout"
                );
                self.last_bind_error = Some(err);
            }
        }
    }

    fn bind_active(&mut self) -> Result<(), BindError> {
        self.slots.clear();
        let layout = self.layouts.get(self.active);
        for row in 0..self.binder.row_count() {
            let slots = self.binder.slot_count(row)?;
            for slot in 0..slots {
                let id = SlotId::new(row, slot);
                let key = layout.key_or_empty(row, slot);
                let style = KeyStyle::resolve(&key, &self.config).map_err(|reason| {
                    BindError::InvalidKey {
                        row,
                        slot,
                        label: key.label.clone(),
                        reason,
                    }
                })?;
                let bound = BoundKey { key, style };
                self.binder.bind(id, &bound)?;
                self.slots.insert(id, bound.key);
            }
        }
        Ok(())
    }
}

fn apply_to_target(target: &SharedTarget, edit: Edit<'_>) {
    let mut t = target.borrow_mut();
    let outcome = apply_edit(t.content(), t.selection_anchor(), t.selection_focus(), edit);
    t.set_content(outcome.content);
    t.set_caret(outcome.caret);
}

/// Re-apply text and caret/selection unchanged so the host redraws them.
fn refresh_target(target: &SharedTarget) {
    let mut t = target.borrow_mut();
    let content = t.content().to_string();
    t.set_content(content);
    let (anchor, focus) = (t.selection_anchor(), t.selection_focus());
    if anchor == focus {
        let caret = t.caret();
        t.set_caret(caret);
    } else {
        t.set_selection(anchor, focus);
    }
}

/// Focus the target without triggering its select-all-on-focus behaviour.
fn refocus(target: &SharedTarget) {
    let mut t = target.borrow_mut();
    let select_all = t.select_all_on_focus();
    t.set_select_all_on_focus(false);
    t.focus();
    t.set_select_all_on_focus(select_all);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::SlotGrid;
    use crate::key::KeyOperation;
    use crate::layout::KeyRow;
    use crate::target::{share, TextField, TextTarget};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn layouts() -> LayoutSet {
        let switches = KeyRow::new(vec![
            KeyDescriptor::operation("⇧", KeyOperation::Shift),
            KeyDescriptor::operation("⇪", KeyOperation::Caps),
            KeyDescriptor::operation("123", KeyOperation::Numbers),
            KeyDescriptor::operation("#+=", KeyOperation::Symbols),
            KeyDescriptor::operation("ABC", KeyOperation::Alpha),
        ]);
        LayoutSet {
            alpha: LayoutConfig::new("alpha", vec![KeyRow::from_chars("abc"), switches.clone()]),
            shift: LayoutConfig::new(
                "shift",
                vec![
                    KeyRow::new(vec![
                        KeyDescriptor::value("A").with_reset_to_alpha(),
                        KeyDescriptor::value("B").with_reset_to_alpha(),
                    ]),
                    switches.clone(),
                ],
            ),
            caps: LayoutConfig::new("caps", vec![KeyRow::from_chars("ABC"), switches.clone()]),
            numbers: LayoutConfig::new("numbers", vec![KeyRow::from_chars("123"), switches.clone()]),
            symbols: LayoutConfig::new("symbols", vec![KeyRow::from_chars("!?#"), switches]),
        }
    }

    fn open(field: TextField) -> (Keyboard<SlotGrid>, Rc<RefCell<TextField>>) {
        let mut keyboard = Keyboard::new(layouts(), SlotGrid::new(&[3, 5]));
        let field = share(field);
        let mut focus = FocusTracker::new();
        focus.on_focus(field.clone());
        keyboard.sync_focus(&focus);
        keyboard.take_events();
        (keyboard, field)
    }

    #[test]
    fn no_target_is_a_no_op() {
        let mut keyboard = Keyboard::new(layouts(), SlotGrid::new(&[3, 5]));
        keyboard.evaluate_key(&KeyDescriptor::value("a"));
        keyboard.evaluate_key(&KeyDescriptor::operation("⇧", KeyOperation::Shift));
        keyboard.background_touch();
        assert_eq!(keyboard.active_layout(), LayoutKind::Alpha);
        assert!(keyboard.take_events().is_empty());
        assert_eq!(keyboard.binder().bound_count(), 0);
    }

    #[test]
    fn empty_label_is_a_no_op() {
        let (mut keyboard, field) = open(TextField::with_content("x"));
        let focus_before = field.borrow().focus_count();
        keyboard.evaluate_key(&KeyDescriptor::empty());
        keyboard.evaluate_key(&KeyDescriptor::operation("", KeyOperation::Backspace));
        assert_eq!(field.borrow().content(), "x");
        assert_eq!(field.borrow().focus_count(), focus_before);
    }

    #[test]
    fn value_key_appends_at_caret() {
        let (mut keyboard, field) = open(TextField::with_content("hello"));
        keyboard.evaluate_key(&KeyDescriptor::value("!"));
        assert_eq!(field.borrow().content(), "hello!");
        assert_eq!(field.borrow().caret(), 6);
        assert_eq!(field.borrow().selection(), (6, 6));
    }

    #[test]
    fn backspace_over_selection() {
        let (mut keyboard, field) = open(TextField::with_content("hello world").with_selection(0, 5));
        keyboard.evaluate_key(&KeyDescriptor::operation("⌫", KeyOperation::Backspace));
        assert_eq!(field.borrow().content(), " world");
        assert_eq!(field.borrow().caret(), 0);
    }

    #[test]
    fn backspace_on_empty_field() {
        let (mut keyboard, field) = open(TextField::new());
        keyboard.evaluate_key(&KeyDescriptor::operation("⌫", KeyOperation::Backspace));
        assert_eq!(field.borrow().content(), "");
        assert_eq!(field.borrow().caret(), 0);
    }

    #[test]
    fn space_inserts_blank() {
        let (mut keyboard, field) = open(TextField::with_content("ab").with_selection(1, 1));
        keyboard.evaluate_key(&KeyDescriptor::operation("space", KeyOperation::Space));
        assert_eq!(field.borrow().content(), "a b");
        assert_eq!(field.borrow().caret(), 2);
    }

    #[test]
    fn submit_on_multiline_inserts_line_break() {
        let (mut keyboard, field) = open(TextField::with_content("line").multiline());
        keyboard.evaluate_key(&KeyDescriptor::operation("⏎", KeyOperation::Submit));
        assert_eq!(field.borrow().content(), "line\n");
        assert_eq!(field.borrow().caret(), 5);
        assert_eq!(field.borrow().submit_count(), 0);
        assert!(keyboard.take_events().is_empty());
    }

    #[test]
    fn submit_on_single_line_calls_submit_once() {
        let (mut keyboard, field) = open(TextField::with_content("query"));
        keyboard.evaluate_key(&KeyDescriptor::operation("⏎", KeyOperation::Submit));
        assert_eq!(field.borrow().content(), "query");
        assert_eq!(field.borrow().submit_count(), 1);
        assert_eq!(keyboard.take_events(), vec![KeyboardEvent::Submitted]);
    }

    #[test]
    fn layout_operations_switch_layouts() {
        let (mut keyboard, _field) = open(TextField::new());
        let cases = [
            (KeyOperation::Shift, LayoutKind::Shift),
            (KeyOperation::Caps, LayoutKind::Caps),
            (KeyOperation::Numbers, LayoutKind::Numbers),
            (KeyOperation::Symbols, LayoutKind::Symbols),
            (KeyOperation::Alpha, LayoutKind::Alpha),
        ];
        for (op, kind) in cases {
            keyboard.evaluate_key(&KeyDescriptor::operation("switch", op));
            assert_eq!(keyboard.active_layout(), kind);
            assert_eq!(
                keyboard.take_events(),
                vec![KeyboardEvent::LayoutChanged { layout: kind }]
            );
        }
    }

    #[test]
    fn one_shot_shift_returns_to_alpha() {
        let (mut keyboard, field) = open(TextField::new());
        keyboard.press(SlotId::new(1, 0));
        assert_eq!(keyboard.active_layout(), LayoutKind::Shift);
        assert_eq!(keyboard.bound_key(SlotId::new(0, 0)).unwrap().label, "A");

        keyboard.press(SlotId::new(0, 0));
        assert_eq!(field.borrow().content(), "A");
        assert_eq!(keyboard.active_layout(), LayoutKind::Alpha);
        assert_eq!(keyboard.bound_key(SlotId::new(0, 0)).unwrap().label, "a");
    }

    #[test]
    fn caps_stays_active_after_typing() {
        let (mut keyboard, field) = open(TextField::new());
        keyboard.press(SlotId::new(1, 1));
        keyboard.press(SlotId::new(0, 2));
        keyboard.press(SlotId::new(0, 0));
        assert_eq!(field.borrow().content(), "CA");
        assert_eq!(keyboard.active_layout(), LayoutKind::Caps);
    }

    #[test]
    fn missing_entries_bind_hidden_slots() {
        let (keyboard, _field) = open(TextField::new());
        let grid = keyboard.binder();
        assert_eq!(grid.bound_count(), 8);
        assert_eq!(grid.visible_labels(0), vec!["a", "b", "c"]);

        let (mut keyboard, _field) = open(TextField::new());
        keyboard.set_active_layout(LayoutKind::Shift, true);
        let hidden = keyboard.binder().binding(SlotId::new(0, 2)).unwrap();
        assert!(!hidden.visible());
        assert!(keyboard.bound_key(SlotId::new(0, 2)).unwrap().is_empty());
    }

    #[test]
    fn pressing_hidden_or_unknown_slot_does_nothing() {
        let (mut keyboard, field) = open(TextField::with_content("z"));
        keyboard.set_active_layout(LayoutKind::Shift, true);
        keyboard.press(SlotId::new(0, 2));
        keyboard.press(SlotId::new(7, 7));
        assert_eq!(field.borrow().content(), "z");
        assert_eq!(keyboard.active_layout(), LayoutKind::Shift);
    }

    #[test]
    fn trailing_refocus_suppresses_select_all() {
        let (mut keyboard, field) = open(TextField::with_content("abc").with_select_all_on_focus());
        keyboard.evaluate_key(&KeyDescriptor::value("d"));
        let f = field.borrow();
        assert_eq!(f.content(), "abcd");
        assert_eq!(f.selection(), (4, 4));
        assert_eq!(f.focus_count(), 1);
        assert!(f.select_all_on_focus());
    }

    #[test]
    fn background_touch_keeps_state_and_refocuses() {
        let (mut keyboard, field) = open(TextField::with_content("hello").with_selection(1, 3));
        let writes = field.borrow().caret_writes();
        keyboard.background_touch();
        let f = field.borrow();
        assert_eq!(f.content(), "hello");
        assert_eq!(f.selection(), (1, 3));
        assert_eq!(f.focus_count(), 1);
        assert!(f.caret_writes() > writes);
    }

    #[test]
    fn edits_rewrite_caret_even_when_unchanged() {
        let (mut keyboard, field) = open(TextField::new());
        keyboard.evaluate_key(&KeyDescriptor::operation("⌫", KeyOperation::Backspace));
        assert_eq!(field.borrow().caret(), 0);
        assert_eq!(field.borrow().caret_writes(), 1);
    }

    #[test]
    fn sync_focus_opens_and_closes_once() {
        let mut keyboard = Keyboard::new(layouts(), SlotGrid::new(&[3, 5]));
        let mut focus = FocusTracker::new();
        assert_eq!(keyboard.sync_focus(&focus), None);

        focus.on_focus(share(TextField::new()));
        assert_eq!(
            keyboard.sync_focus(&focus),
            Some(KeyboardEvent::Opened { layout: LayoutKind::Alpha })
        );
        assert_eq!(keyboard.sync_focus(&focus), None);
        assert!(keyboard.is_open());

        focus.on_blur(true);
        assert_eq!(keyboard.sync_focus(&focus), Some(KeyboardEvent::Closed));
        assert_eq!(keyboard.sync_focus(&focus), None);
        assert!(!keyboard.is_open());

        assert_eq!(
            keyboard.take_events(),
            vec![
                KeyboardEvent::Opened { layout: LayoutKind::Alpha },
                KeyboardEvent::Closed
            ]
        );
    }

    #[test]
    fn opening_resets_to_alpha() {
        let (mut keyboard, _field) = open(TextField::new());
        keyboard.set_active_layout(LayoutKind::Symbols, true);

        let mut focus = FocusTracker::new();
        focus.on_focus(share(TextField::new()));
        keyboard.sync_focus(&focus);
        assert_eq!(keyboard.active_layout(), LayoutKind::Alpha);
        assert_eq!(keyboard.bound_key(SlotId::new(0, 0)).unwrap().label, "a");
    }

    struct BrokenBinder;

    impl LayoutBinder for BrokenBinder {
        fn row_count(&self) -> usize {
            2
        }

        fn slot_count(&self, row: usize) -> Result<usize, BindError> {
            if row == 0 {
                Ok(3)
            } else {
                Err(BindError::MissingRow { row })
            }
        }

        fn bind(&mut self, _slot: SlotId, _bound: &BoundKey) -> Result<(), BindError> {
            Ok(())
        }
    }

    #[test]
    fn bind_failure_is_contained() {
        let mut keyboard = Keyboard::new(layouts(), BrokenBinder);
        let field = share(TextField::with_content("ok"));
        let mut focus = FocusTracker::new();
        focus.on_focus(field.clone());

        assert!(keyboard.sync_focus(&focus).is_some());
        assert_eq!(keyboard.last_bind_error(), Some(&BindError::MissingRow { row: 1 }));

        // Row 0 was bound before the failure and still works.
        keyboard.press(SlotId::new(0, 1));
        assert_eq!(field.borrow().content(), "okb");

        keyboard.evaluate_key(&KeyDescriptor::operation("123", KeyOperation::Numbers));
        assert_eq!(keyboard.active_layout(), LayoutKind::Numbers);
        assert!(keyboard.last_bind_error().is_some());
    }

    #[test]
    fn invalid_key_width_is_reported() {
        let mut set = layouts();
        set.numbers.rows[0].keys[1].width_multiplier = f32::INFINITY;
        let mut keyboard = Keyboard::new(set, SlotGrid::new(&[3, 5]));
        keyboard.set_active_layout(LayoutKind::Numbers, false);
        match keyboard.last_bind_error() {
            Some(BindError::InvalidKey { row, slot, label, .. }) => {
                assert_eq!((*row, *slot, label.as_str()), (0, 1, "2"));
            }
            other => panic!("unexpected bind result: {:?}", other),
        }

        keyboard.set_active_layout(LayoutKind::Alpha, false);
        assert!(keyboard.last_bind_error().is_none());
    }
}
