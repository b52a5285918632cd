//! Insertion and deletion against a caret/selection.
//!
//! These are pure functions over `(content, anchor, focus)`; the engine
//! applies their [`EditOutcome`] to the focused target. Offsets are `char`
//! positions and are clamped to the content length before use.

/// Edit to perform at the current edit point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    /// Replace the selection (or insert at the caret) with text
    Insert(&'a str),
    /// Delete the selection, or the character before the caret
    Backspace,
}

/// Resulting text and caret; the selection collapses onto the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub content: String,
    pub caret: usize,
}

/// Byte index of the `char_pos`-th character, or `s.len()` past the end.
pub fn byte_offset(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map_or(s.len(), |(i, _)| i)
}

/// Apply `edit` to `content` with the selection spanning `anchor`..`focus`.
///
/// Inserting always advances the caret to `lo + 1`, whatever the length of
/// the inserted text. Backspace lands the caret at the deletion start.
pub fn apply_edit(content: &str, anchor: usize, focus: usize, edit: Edit<'_>) -> EditOutcome {
    let len = content.chars().count();
    let lo = anchor.min(focus).min(len);
    let hi = anchor.max(focus).min(len);
    let has_selection = lo != hi;
    let tail = &content[byte_offset(content, hi)..];

    match edit {
        Edit::Insert(text) => {
            let head = &content[..byte_offset(content, lo)];
            EditOutcome {
                content: [head, text, tail].concat(),
                caret: lo + 1,
            }
        }
        Edit::Backspace => {
            let start = if has_selection { lo } else { lo.saturating_sub(1) };
            let head = &content[..byte_offset(content, start)];
            EditOutcome {
                content: [head, tail].concat(),
                caret: start,
            }
        }
    }
}
