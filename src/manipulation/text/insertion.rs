use super::{TextManipulator, check_range, text_for_error};
use crate::manipulation::error::ReconcileError;

/// Replace `[insert_pos, insert_pos + replacing_length)` with `new_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionTextManipulator {
    insert_pos: usize,
    new_text: String,
    replacing_length: usize,
}

impl InsertionTextManipulator {
    /// A point insertion
    pub fn new(insert_pos: usize, new_text: impl Into<String>) -> Self {
        Self {
            insert_pos,
            new_text: new_text.into(),
            replacing_length: 0,
        }
    }

    pub fn replacing(mut self, replacing_length: usize) -> Self {
        self.replacing_length = replacing_length;
        self
    }

    pub fn insert_pos(&self) -> usize {
        self.insert_pos
    }

    pub fn inserted_text(&self) -> &str {
        &self.new_text
    }

    pub fn replacing_length(&self) -> usize {
        self.replacing_length
    }
}

impl TextManipulator for InsertionTextManipulator {
    fn new_text(&self, old_text: &str) -> Result<String, ReconcileError> {
        let end = self.insert_pos + self.replacing_length;
        check_range(old_text, self.insert_pos, end)?;
        let mut text = String::with_capacity(old_text.len() + self.new_text.len());
        text.push_str(&old_text[..self.insert_pos]);
        text.push_str(&self.new_text);
        text.push_str(&old_text[end..]);
        Ok(text)
    }

    fn text_for_error(&self, new_text: &str) -> String {
        text_for_error(new_text, self.insert_pos, self.new_text.len())
    }
}
