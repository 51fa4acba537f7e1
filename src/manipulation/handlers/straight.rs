use super::{NodeHandler, ReconcileContext, handle_for_values};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::iter::ChildMode;
use crate::parser::SyntaxElement;
use crate::wrapper::NodeId;

/// Reconciliation for edits that cannot change the tree's shape
#[derive(Debug, Default, Clone, Copy)]
pub struct StraightReplacementNodeHandler;

impl NodeHandler for StraightReplacementNodeHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        straight_replace(self, cx, current, new)
    }
}

/// Require equal kinds, pair up the children when any of them is wrapped
/// and hand each pair back to `handler`, then re-point `current`.
///
/// Handlers that only differ at one node of the tree (such as the parent
/// finder) call this for every other node so recursion keeps going through
/// them.
pub fn straight_replace(
    handler: &mut dyn NodeHandler,
    cx: &mut ReconcileContext<'_>,
    current: NodeId,
    new: &SyntaxElement,
) -> Result<(), ReconcileError> {
    let current_kind = cx.cache.kind(current)?;
    if current_kind != new.kind() {
        return Err(ReconcileError::KindMismatch {
            current: current_kind,
            new: new.kind(),
        });
    }

    if cx.cache.has_wrapped_children(current)? {
        let mode = ChildMode::for_wrapper(cx.cache, current)?;
        let current_children = mode.children(&cx.cache.element(current)?);
        let new_children = mode.children(new);
        if current_children.len() != new_children.len() {
            return Err(ReconcileError::ChildCountMismatch {
                current: current_children.len(),
                new: new_children.len(),
            });
        }
        for (current_child, new_child) in current_children.iter().zip(&new_children) {
            handle_for_values(handler, cx, current_child, new_child)?;
        }
    }

    cx.cache.replace_identity(current, new.clone())?;
    Ok(())
}
