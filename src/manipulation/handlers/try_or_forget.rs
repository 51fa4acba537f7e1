use tracing::warn;

use super::{NodeHandler, ReconcileContext};
use crate::manipulation::error::ReconcileError;
use crate::parser::{SyntaxElement, SyntaxKind};
use crate::wrapper::NodeId;

/// Runs `handler` on the file root; if it fails, every wrapper of the file
/// except the root is forgotten and the root moves to the new tree
pub struct TryOrForgetNodeHandler {
    handler: Box<dyn NodeHandler>,
}

impl TryOrForgetNodeHandler {
    pub fn new(handler: Box<dyn NodeHandler>) -> Self {
        Self { handler }
    }
}

impl NodeHandler for TryOrForgetNodeHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        let kind = cx.cache.kind(current)?;
        if kind != SyntaxKind::SOURCE_FILE {
            return Err(ReconcileError::NotSupported(format!(
                "try-or-forget handling must start at the source file, not {kind:?}"
            )));
        }
        if let Err(err) = self.handler.handle_node(cx, current, new) {
            warn!(
                file = %cx.cache.file(),
                error = %err,
                "could not replace tree, forgetting all nodes instead"
            );
            cx.cache.forget_all_except(current);
            cx.cache.replace_identity(current, new.clone())?;
        }
        Ok(())
    }
}
