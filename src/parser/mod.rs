//! Rowan-based parser for the script language
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! Every edit produces a brand-new tree; nothing is patched in place.
//! Keeping long-lived handles valid across those reparses is the job of
//! [`crate::manipulation`].
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! ParserOracle → the only view the manipulation layer has of parsing
//! ```

#[allow(clippy::module_inception)]
mod parser;

mod lexer;
mod oracle;
mod syntax_kind;

pub use lexer::{Lexer, Token, tokenize};
pub use oracle::{OracleError, ParserOracle, ScriptKind, ScriptParser};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{ScriptLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
