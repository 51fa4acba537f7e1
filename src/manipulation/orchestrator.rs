//! Runs one manipulation: new text, reparse, reconcile, commit.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{ManipulationError, ReconcileError};
use super::handlers::{NodeHandler, ReconcileContext};
use super::text::TextManipulator;
use crate::parser::{ParserOracle, ScriptKind, SyntaxElement, SyntaxNode};
use crate::wrapper::{NodeCache, NodeId};

/// What the orchestrator needs from a file
pub trait ManipulationTarget {
    fn path(&self) -> &Path;

    /// The authoritative text
    fn text(&self) -> &str;

    fn cache_mut(&mut self) -> &mut NodeCache;

    /// Wrapper of the root of the current tree
    fn root_id(&self) -> NodeId;

    /// Called before anything else happens
    fn before_modify(&mut self);

    /// Adopt the reconciled tree
    fn commit(&mut self, text: String, tree: SyntaxNode, path: PathBuf, script_kind: ScriptKind);
}

pub struct Orchestrator<'a> {
    oracle: &'a dyn ParserOracle,
}

impl<'a> Orchestrator<'a> {
    pub fn new(oracle: &'a dyn ParserOracle) -> Self {
        Self { oracle }
    }

    /// Apply `manipulator` to the target's text and reconcile its wrappers
    /// with `handler`, optionally moving the file to `new_path`.
    ///
    /// On failure the target's text and tree are unchanged, but some wrappers
    /// may already have been migrated or forgotten.
    pub fn perform(
        &self,
        target: &mut dyn ManipulationTarget,
        manipulator: &dyn TextManipulator,
        handler: &mut dyn NodeHandler,
        new_path: Option<PathBuf>,
    ) -> Result<(), ManipulationError> {
        target.before_modify();
        let old_text = target.text().to_string();
        let path = new_path.unwrap_or_else(|| target.path().to_path_buf());
        let script_kind = ScriptKind::from_path(&path);
        debug!(path = %path.display(), ?script_kind, "performing manipulation");

        let new_text = match manipulator.new_text(&old_text) {
            Ok(text) => text,
            Err(err) => {
                let excerpt = manipulator.text_for_error(&old_text);
                let new_text = old_text.clone();
                return Err(self.failure(path, old_text, new_text, excerpt, script_kind, err));
            }
        };

        let new_root = match self.oracle.parse(&new_text, &path, script_kind) {
            Ok(parse) => parse.syntax(),
            Err(err) => {
                let excerpt = manipulator.text_for_error(&new_text);
                return Err(self.failure(path, old_text, new_text, excerpt, script_kind, err.into()));
            }
        };

        let root = target.root_id();
        let mut cx = ReconcileContext::new(target.cache_mut());
        if let Err(err) = handler.handle_node(&mut cx, root, &SyntaxElement::Node(new_root.clone())) {
            let excerpt = manipulator.text_for_error(&new_text);
            return Err(self.failure(path, old_text, new_text, excerpt, script_kind, err));
        }

        debug!(path = %path.display(), "manipulation committed");
        target.commit(new_text, new_root, path, script_kind);
        Ok(())
    }

    fn failure(
        &self,
        path: PathBuf,
        old_text: String,
        new_text: String,
        excerpt: String,
        script_kind: ScriptKind,
        cause: ReconcileError,
    ) -> ManipulationError {
        debug!(path = %path.display(), error = %cause, "manipulation failed");
        // standalone reparse, only for diagnostics
        let diagnostics = self
            .oracle
            .parse(&new_text, &path, script_kind)
            .map(|parse| self.oracle.syntactic_diagnostics(&parse))
            .unwrap_or_default();
        ManipulationError::new(path, old_text, new_text, excerpt, diagnostics, cause)
    }
}
