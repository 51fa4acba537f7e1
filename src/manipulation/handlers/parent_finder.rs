use super::{NodeHandler, ReconcileContext, straight_replace};
use crate::manipulation::error::ReconcileError;
use crate::parser::SyntaxElement;
use crate::wrapper::NodeId;

/// Straight replacement from the root until the changing parent's wrapper
/// is reached, which is handed to `parent_handler`
pub struct ParentFinderReplacementNodeHandler {
    changing_parent: NodeId,
    parent_handler: Box<dyn NodeHandler>,
    found_parent: bool,
}

impl ParentFinderReplacementNodeHandler {
    pub fn new(changing_parent: NodeId, parent_handler: Box<dyn NodeHandler>) -> Self {
        Self {
            changing_parent,
            parent_handler,
            found_parent: false,
        }
    }
}

impl NodeHandler for ParentFinderReplacementNodeHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        if !self.found_parent && current == self.changing_parent {
            self.found_parent = true;
            self.parent_handler.handle_node(cx, current, new)
        } else {
            straight_replace(self, cx, current, new)
        }
    }
}
