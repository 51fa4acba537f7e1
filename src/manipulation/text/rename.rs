use smol_str::SmolStr;

use super::{TextManipulator, check_range, text_for_error};
use crate::manipulation::error::ReconcileError;
use crate::parser::{SyntaxKind, TextRange, tokenize};

/// One occurrence of the renamed symbol, in pre-edit coordinates.
///
/// Prefix and suffix text keep the surrounding code meaning the same thing,
/// e.g. `a: ` when a shorthand property `a` is renamed or `a as ` for an
/// import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameLocation {
    pub range: TextRange,
    pub prefix: Option<SmolStr>,
    pub suffix: Option<SmolStr>,
}

impl RenameLocation {
    pub fn new(range: TextRange) -> Self {
        Self {
            range,
            prefix: None,
            suffix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<SmolStr>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<SmolStr>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// Substitute one new name at a batch of disjoint locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameLocationTextManipulator {
    /// Sorted by start offset
    locations: Vec<RenameLocation>,
    new_name: SmolStr,
}

impl RenameLocationTextManipulator {
    pub fn new(
        mut locations: Vec<RenameLocation>,
        new_name: impl Into<SmolStr>,
    ) -> Result<Self, ReconcileError> {
        let new_name = new_name.into();
        if !is_identifier_name(&new_name) {
            return Err(ReconcileError::text_edit(format!(
                "'{new_name}' is not a valid identifier"
            )));
        }
        locations.sort_by_key(|location| location.range.start());
        if let Some(pair) = locations
            .windows(2)
            .find(|pair| pair[0].range.end() > pair[1].range.start())
        {
            return Err(ReconcileError::text_edit(format!(
                "rename locations {:?} and {:?} overlap",
                pair[0].range, pair[1].range
            )));
        }
        Ok(Self {
            locations,
            new_name,
        })
    }

    pub fn locations(&self) -> &[RenameLocation] {
        &self.locations
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }
}

impl TextManipulator for RenameLocationTextManipulator {
    fn new_text(&self, old_text: &str) -> Result<String, ReconcileError> {
        let mut text = String::with_capacity(old_text.len());
        let mut copied_to = 0;
        for location in &self.locations {
            let start = usize::from(location.range.start());
            let end = usize::from(location.range.end());
            check_range(old_text, start, end)?;
            text.push_str(&old_text[copied_to..start]);
            text.push_str(location.prefix.as_deref().unwrap_or(""));
            text.push_str(&self.new_name);
            text.push_str(location.suffix.as_deref().unwrap_or(""));
            copied_to = end;
        }
        text.push_str(&old_text[copied_to..]);
        Ok(text)
    }

    fn text_for_error(&self, new_text: &str) -> String {
        match self.locations.first() {
            Some(first) => text_for_error(new_text, usize::from(first.range.start()), self.new_name.len()),
            None => new_text.to_string(),
        }
    }
}

/// Whether `name` lexes as exactly one identifier (so keywords are rejected)
fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    let valid_chars = match chars.next() {
        Some(first) => {
            (unicode_ident::is_xid_start(first) || first == '_' || first == '$')
                && chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$')
        }
        None => false,
    };
    valid_chars && matches!(tokenize(name).as_slice(), [token] if token.kind == SyntaxKind::IDENT)
}
