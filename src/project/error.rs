//! Error types for source file edits.

use std::path::PathBuf;

use thiserror::Error;

use crate::manipulation::{ManipulationError, ReconcileError};
use crate::parser::{OracleError, SyntaxKind};
use crate::wrapper::NodeError;

/// Why an edit was rejected or failed
#[derive(Debug, Clone, Error)]
pub enum EditError {
    /// A handle passed to the edit is forgotten or belongs to another file
    #[error(transparent)]
    Node(#[from] NodeError),

    /// The manipulation itself failed
    #[error(transparent)]
    Manipulation(Box<ManipulationError>),

    /// The edit could not be prepared
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The edit does not apply to this kind of node
    #[error("Cannot {operation} a {kind:?} node")]
    Unsupported {
        operation: &'static str,
        kind: SyntaxKind,
    },

    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Range {start}..{end} is outside the text (length {len})")]
    RangeOutOfBounds { start: u32, end: u32, len: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),
}

impl From<ManipulationError> for EditError {
    fn from(err: ManipulationError) -> Self {
        Self::Manipulation(Box::new(err))
    }
}

impl EditError {
    pub fn unsupported(operation: &'static str, kind: SyntaxKind) -> Self {
        Self::Unsupported { operation, kind }
    }

    /// The manipulation error, when the edit got that far
    pub fn as_manipulation(&self) -> Option<&ManipulationError> {
        match self {
            Self::Manipulation(err) => Some(err),
            _ => None,
        }
    }
}
