//! Text manipulators: pure strategies that compute a file's new full text.
//!
//! A manipulator never looks at wrappers. It receives the old text and
//! returns the new one; the orchestrator reparses the result.

mod full;
mod insertion;
mod rename;
mod unwrap;

pub use full::FullReplacementTextManipulator;
pub use insertion::InsertionTextManipulator;
pub use rename::{RenameLocation, RenameLocationTextManipulator};
pub use unwrap::UnwrapTextManipulator;

use super::error::ReconcileError;

/// Bytes of context kept on each side of a change in error excerpts
const ERROR_CONTEXT: usize = 100;

pub trait TextManipulator {
    /// The complete new text of the file
    fn new_text(&self, old_text: &str) -> Result<String, ReconcileError>;

    /// The part of `new_text` worth showing when the manipulation fails
    fn text_for_error(&self, new_text: &str) -> String;
}

/// The lines of `text` touching `[pos, pos + len)`, widened by up to
/// [`ERROR_CONTEXT`] bytes on each side; cut ends are marked with `...`
pub fn text_for_error(text: &str, pos: usize, len: usize) -> String {
    let pos = floor_char_boundary(text, pos.min(text.len()));
    let change_end = floor_char_boundary(text, (pos + len).min(text.len()));
    let line_start = text[..pos].rfind('\n').unwrap_or(0);
    let start = floor_char_boundary(text, line_start.saturating_sub(ERROR_CONTEXT));
    let end = match text[change_end..].find('\n') {
        Some(offset) => {
            floor_char_boundary(text, (change_end + offset + ERROR_CONTEXT).min(text.len()))
        }
        None => text.len(),
    };

    let mut excerpt = String::new();
    if start != 0 {
        excerpt.push_str("...");
    }
    excerpt.push_str(&text[start..end]);
    if end != text.len() {
        excerpt.push_str("...");
    }
    excerpt
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Check that `[start, end)` addresses whole characters of `text`
fn check_range(text: &str, start: usize, end: usize) -> Result<(), ReconcileError> {
    if start > end || end > text.len() {
        return Err(ReconcileError::text_edit(format!(
            "range {start}..{end} is outside the text (length {})",
            text.len()
        )));
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(ReconcileError::text_edit(format!(
            "range {start}..{end} splits a character"
        )));
    }
    Ok(())
}
