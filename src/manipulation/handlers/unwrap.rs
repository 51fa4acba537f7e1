use super::{NodeHandler, ReconcileContext, StraightReplacementNodeHandler, handle_for_values};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::iter::{ChildMode, child_iters, precise_children};
use crate::parser::SyntaxElement;
use crate::wrapper::{NodeId, child_syntax_list};

/// Reconciles the parent of an unwrapped node: the members of the node's
/// child syntax list now sit where the node was
#[derive(Debug, Clone, Copy)]
pub struct UnwrapParentHandler {
    child_index: usize,
}

impl UnwrapParentHandler {
    pub fn new(child_index: usize) -> Self {
        Self { child_index }
    }
}

impl NodeHandler for UnwrapParentHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        let (mut current_children, mut new_children) =
            child_iters(ChildMode::Precise, &cx.cache.element(current)?, new);

        for _ in 0..self.child_index {
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            handle_for_values(&mut StraightReplacementNodeHandler, cx, &current_child, &new_child)?;
        }

        let unwrapped = current_children.next_or_leftover("new")?;
        let unwrapped_node = match &unwrapped {
            SyntaxElement::Node(node) => node.clone(),
            SyntaxElement::Token(token) => {
                return Err(ReconcileError::NotSupported(format!(
                    "cannot unwrap token {:?}",
                    token.kind()
                )));
            }
        };
        let list = child_syntax_list(&unwrapped_node).ok_or(ReconcileError::MissingChildSyntaxList {
            kind: unwrapped_node.kind(),
        })?;
        for member in precise_children(&SyntaxElement::Node(list)) {
            let new_child = new_children.next_or_leftover("current")?;
            handle_for_values(&mut StraightReplacementNodeHandler, cx, &member, &new_child)?;
        }

        // members were re-pointed above, so only the shell is left
        if let Some(id) = cx.cache.get_existing(&unwrapped) {
            cx.cache.forget_subtree(id)?;
        }

        while !current_children.done() {
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            handle_for_values(&mut StraightReplacementNodeHandler, cx, &current_child, &new_child)?;
        }
        new_children.ensure_done()?;

        cx.cache.replace_identity(current, new.clone())?;
        Ok(())
    }
}
