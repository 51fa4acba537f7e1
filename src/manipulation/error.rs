//! Error types for manipulations.
//!
//! [`ReconcileError`] is internal control flow: it unwinds from the failing
//! handler to the orchestrator or to a try-or-forget handler.
//! [`ManipulationError`] is what the orchestrator hands back to callers.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::base::LineIndex;
use crate::parser::{OracleError, SyntaxError, SyntaxKind};
use crate::wrapper::NodeError;

/// Failures while computing new text or aligning the old and new trees
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Aligned elements differ in kind
    #[error(
        "Error replacing tree! Perhaps a syntax error was inserted (Current: {current:?} -- New: {new:?})."
    )]
    KindMismatch { current: SyntaxKind, new: SyntaxKind },

    /// Straight replacement found a different number of children
    #[error(
        "Error replacing tree: The children of the old and new trees were expected to have the same count ({current}:{new})."
    )]
    ChildCountMismatch { current: usize, new: usize },

    /// One side still had children after the other was exhausted
    #[error("Error replacing tree: Should not have children left over ({side} side).")]
    LeftoverChildren { side: &'static str },

    #[error("Expected {kind:?} to have a child syntax list.")]
    MissingChildSyntaxList { kind: SyntaxKind },

    #[error(
        "Attempted to get information from a node that was removed or forgotten (last kind: {kind:?})."
    )]
    StaleNode { kind: SyntaxKind },

    #[error("Node handle belongs to {owner}, not {file}.")]
    ForeignNode {
        owner: crate::base::FileId,
        file: crate::base::FileId,
    },

    /// The text edit itself is impossible (bad range, overlapping spans)
    #[error("Invalid text edit: {0}")]
    TextEdit(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl ReconcileError {
    pub fn text_edit(message: impl Into<String>) -> Self {
        Self::TextEdit(message.into())
    }
}

impl From<NodeError> for ReconcileError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Forgotten { kind } => Self::StaleNode { kind },
            NodeError::Foreign { owner, file } => Self::ForeignNode { owner, file },
        }
    }
}

/// A failed manipulation; the file's text and tree are left as they were
#[derive(Debug, Clone, Error)]
#[error(
    "Manipulation error: {}",
    render_details(.message, .formatted_diagnostics, .path, .excerpt)
)]
pub struct ManipulationError {
    pub path: PathBuf,
    pub old_text: String,
    pub new_text: String,
    /// The new text around the change
    pub excerpt: String,
    /// Syntax errors of the new text parsed on its own
    pub diagnostics: Vec<SyntaxError>,
    pub message: String,
    /// The underlying failure
    pub cause: ReconcileError,
    formatted_diagnostics: Option<String>,
}

impl ManipulationError {
    pub fn new(
        path: PathBuf,
        old_text: String,
        new_text: String,
        excerpt: String,
        diagnostics: Vec<SyntaxError>,
        cause: ReconcileError,
    ) -> Self {
        let formatted_diagnostics = (!diagnostics.is_empty())
            .then(|| format_diagnostics(&path, &new_text, &diagnostics));
        Self {
            message: cause.to_string(),
            path,
            old_text,
            new_text,
            excerpt,
            diagnostics,
            cause,
            formatted_diagnostics,
        }
    }

    /// Whether the new text had syntax errors of its own
    pub fn inserted_syntax_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

fn render_details(
    message: &str,
    formatted_diagnostics: &Option<String>,
    path: &Path,
    excerpt: &str,
) -> String {
    let mut out = String::new();
    if let Some(diagnostics) = formatted_diagnostics {
        out.push_str("A syntax error was inserted.\n\n");
        out.push_str(diagnostics);
        out.push('\n');
    }
    let _ = write!(
        out,
        "{message}\n\n-- Details --\nPath: {}\nText: {excerpt:?}",
        path.display()
    );
    out
}

/// Render diagnostics as `path:line:col - error: message` followed by the
/// offending line and a caret
pub fn format_diagnostics(path: &Path, text: &str, diagnostics: &[SyntaxError]) -> String {
    let index = LineIndex::new(text);
    let mut out = String::new();
    for diagnostic in diagnostics {
        let start = index.line_col(diagnostic.range.start());
        let _ = writeln!(
            out,
            "{}:{}:{} - error: {}",
            path.display(),
            start.line + 1,
            start.col + 1,
            diagnostic.message
        );
        let line_start = index.line_start(start.line).map(usize::from).unwrap_or(0);
        let line = text[line_start..].lines().next().unwrap_or("");
        let _ = writeln!(out, "    {line}");
        let _ = writeln!(out, "    {}^", " ".repeat(start.col as usize));
    }
    out
}
