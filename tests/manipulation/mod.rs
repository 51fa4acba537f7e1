//! Manipulation tests
//!
//! Each test edits a file through the public [`treemorph::SourceFile`] API
//! and checks both the resulting text and which wrappers kept their
//! identity:
//! - Text edits at arbitrary ranges
//! - Structural edits on statement and comma lists
//! - Unwrapping and reordering
//! - Renames and the fallbacks taken when wrappers cannot follow
//! - Manipulation errors and their diagnostics

pub mod tests_errors;
pub mod tests_identity;
pub mod tests_rename;
pub mod tests_structural;
