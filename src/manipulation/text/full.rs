use super::TextManipulator;
use crate::manipulation::error::ReconcileError;

/// Swap the whole text; used for edits that keep the tree's shape, such as
/// moving a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullReplacementTextManipulator {
    new_text: String,
}

impl FullReplacementTextManipulator {
    pub fn new(new_text: impl Into<String>) -> Self {
        Self {
            new_text: new_text.into(),
        }
    }
}

impl TextManipulator for FullReplacementTextManipulator {
    fn new_text(&self, _old_text: &str) -> Result<String, ReconcileError> {
        Ok(self.new_text.clone())
    }

    fn text_for_error(&self, new_text: &str) -> String {
        new_text.to_string()
    }
}
