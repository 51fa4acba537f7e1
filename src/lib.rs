//! # treemorph
//!
//! Long-lived node handles over syntax trees that are fully reparsed after
//! every structural edit.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project       → Project, SourceFile: navigation and edit operations
//!   ↓
//! manipulation  → text manipulators, node handlers, orchestrator
//!   ↓
//! wrapper       → NodeId handles, NodeCache, node variants
//!   ↓
//! parser        → Logos lexer, rowan CST, ParserOracle
//!   ↓
//! base          → Primitives (FileId, TextRange, LineIndex)
//! ```
//!
//! ## Example
//!
//! ```
//! use treemorph::{Project, TextSize};
//!
//! let mut project = Project::new();
//! let file = project.add_file("main.ts", "a();\nb();").unwrap();
//! let root = file.root();
//! let b = file.statements(root).unwrap()[1];
//!
//! file.insert_text(TextSize::new(0), "x();\n").unwrap();
//!
//! assert_eq!(file.full_text(), "x();\na();\nb();");
//! assert_eq!(file.text(b).unwrap(), "b();");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → wrapper → manipulation → project)
// ============================================================================

/// Foundation types: FileId, TextRange, line index
pub mod base;

/// Parser: Logos lexer, rowan CST, parser oracle
pub mod parser;

/// Wrapper handles and their cache
pub mod wrapper;

/// Text manipulation and wrapper reconciliation
pub mod manipulation;

/// Source files and projects
pub mod project;

// Re-export foundation types
pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};

pub use manipulation::{ManipulationError, ManipulationSettings, ReconcileError};
pub use parser::{ParserOracle, ScriptKind, ScriptParser, SyntaxKind};
pub use project::{EditError, Project, SourceFile};
pub use wrapper::{NodeError, NodeId, NodeVariant};
