use super::{NodeHandler, ReconcileContext, StraightReplacementNodeHandler, handle_for_values};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::iter::precise_children;
use crate::parser::{SyntaxElement, SyntaxKind};
use crate::wrapper::NodeId;

/// Reconciles a list in which one member moved from `old_index` to
/// `new_index`. Indices count members only; comma separators keep their
/// positions.
#[derive(Debug, Clone, Copy)]
pub struct ChangeChildOrderParentHandler {
    old_index: usize,
    new_index: usize,
}

impl ChangeChildOrderParentHandler {
    pub fn new(old_index: usize, new_index: usize) -> Self {
        Self {
            old_index,
            new_index,
        }
    }
}

fn split_separators(children: Vec<SyntaxElement>) -> (Vec<SyntaxElement>, Vec<SyntaxElement>) {
    children
        .into_iter()
        .partition(|child| child.kind() != SyntaxKind::COMMA)
}

impl NodeHandler for ChangeChildOrderParentHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        let (mut current_members, current_separators) =
            split_separators(precise_children(&cx.cache.element(current)?));
        let (new_members, new_separators) = split_separators(precise_children(new));

        if current_members.len() != new_members.len() {
            return Err(ReconcileError::ChildCountMismatch {
                current: current_members.len(),
                new: new_members.len(),
            });
        }
        if current_separators.len() != new_separators.len() {
            return Err(ReconcileError::ChildCountMismatch {
                current: current_separators.len(),
                new: new_separators.len(),
            });
        }
        if self.old_index >= current_members.len() || self.new_index >= current_members.len() {
            return Err(ReconcileError::NotSupported(format!(
                "cannot move member {} to {} in a list of {}",
                self.old_index,
                self.new_index,
                current_members.len()
            )));
        }

        let moving = current_members.remove(self.old_index);
        current_members.insert(self.new_index, moving);

        let pairs = current_members
            .iter()
            .zip(&new_members)
            .chain(current_separators.iter().zip(&new_separators));
        for (current_child, new_child) in pairs {
            handle_for_values(&mut StraightReplacementNodeHandler, cx, current_child, new_child)?;
        }

        cx.cache.replace_identity(current, new.clone())?;
        Ok(())
    }
}
