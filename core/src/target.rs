//! Text targets: the host-owned text fields the keyboard edits.
//!
//! The engine never owns a target. The host hands it a shared handle when a
//! field gains focus and the engine reads and writes through [`TextTarget`].
//! Caret and selection positions are `char` offsets into the content.

use std::cell::RefCell;
use std::rc::Rc;

/// Accessor for a focused, editable text field.
pub trait TextTarget {
    /// Current full text.
    fn content(&self) -> &str;

    /// Replace the full text. Implementations may keep caret/selection as-is;
    /// the engine always re-applies them afterwards.
    fn set_content(&mut self, content: String);

    fn selection_anchor(&self) -> usize;

    fn selection_focus(&self) -> usize;

    /// Current caret position.
    fn caret(&self) -> usize {
        self.selection_focus()
    }

    /// Place the caret, collapsing any selection onto it.
    ///
    /// Called even when the value is unchanged so that hosts with a render
    /// cache redraw the caret.
    fn set_caret(&mut self, caret: usize);

    /// Set both ends of the selection.
    fn set_selection(&mut self, anchor: usize, focus: usize);

    fn is_multiline(&self) -> bool;

    /// Host-defined submit action for single-line fields.
    fn submit(&mut self);

    fn select_all_on_focus(&self) -> bool;

    fn set_select_all_on_focus(&mut self, enabled: bool);

    /// Give the field input focus.
    fn focus(&mut self);
}

/// Shared handle to a host-owned target.
pub type SharedTarget = Rc<RefCell<dyn TextTarget>>;

/// Wrap a target so it can be handed to the focus tracker.
pub fn share<T: TextTarget + 'static>(target: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(target))
}

/// Identity comparison of two shared targets.
pub fn same_target(a: &SharedTarget, b: &SharedTarget) -> bool {
    Rc::ptr_eq(a, b)
}

/// In-memory text field.
///
/// Used by the demo CLI and by tests; it counts submits, focus calls and
/// caret writes so callers can observe the engine's side effects.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    content: String,
    anchor: usize,
    focus: usize,
    multiline: bool,
    select_all_on_focus: bool,
    submit_count: usize,
    focus_count: usize,
    caret_writes: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-line field holding `content` with the caret at the end.
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let end = content.chars().count();
        Self {
            content,
            anchor: end,
            focus: end,
            ..Self::default()
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn with_selection(mut self, anchor: usize, focus: usize) -> Self {
        self.anchor = anchor;
        self.focus = focus;
        self
    }

    pub fn with_select_all_on_focus(mut self) -> Self {
        self.select_all_on_focus = true;
        self
    }

    /// Selected range as `(lo, hi)` char offsets.
    pub fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.focus), self.anchor.max(self.focus))
    }

    pub fn submit_count(&self) -> usize {
        self.submit_count
    }

    pub fn focus_count(&self) -> usize {
        self.focus_count
    }

    pub fn caret_writes(&self) -> usize {
        self.caret_writes
    }

    fn len(&self) -> usize {
        self.content.chars().count()
    }
}

impl TextTarget for TextField {
    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
        let len = self.len();
        self.anchor = self.anchor.min(len);
        self.focus = self.focus.min(len);
    }

    fn selection_anchor(&self) -> usize {
        self.anchor
    }

    fn selection_focus(&self) -> usize {
        self.focus
    }

    fn set_caret(&mut self, caret: usize) {
        let caret = caret.min(self.len());
        self.anchor = caret;
        self.focus = caret;
        self.caret_writes += 1;
    }

    fn set_selection(&mut self, anchor: usize, focus: usize) {
        let len = self.len();
        self.anchor = anchor.min(len);
        self.focus = focus.min(len);
        self.caret_writes += 1;
    }

    fn is_multiline(&self) -> bool {
        self.multiline
    }

    fn submit(&mut self) {
        self.submit_count += 1;
    }

    fn select_all_on_focus(&self) -> bool {
        self.select_all_on_focus
    }

    fn set_select_all_on_focus(&mut self, enabled: bool) {
        self.select_all_on_focus = enabled;
    }

    fn focus(&mut self) {
        self.focus_count += 1;
        if self.select_all_on_focus {
            self.anchor = 0;
            self.focus = self.len();
        }
    }
}
