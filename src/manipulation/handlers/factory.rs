use super::{
    ChangeChildOrderParentHandler, DefaultParentHandler, NodeHandler,
    ParentFinderReplacementNodeHandler, RangeHandler, RangeParentHandler, RenameNodeHandler,
    StraightReplacementNodeHandler, TryOrForgetNodeHandler, UnwrapParentHandler,
};
use crate::parser::TextSize;
use crate::wrapper::NodeId;

/// Picks the handler for an edit's shape.
///
/// Handlers for edits below the root are wrapped in a
/// [`ParentFinderReplacementNodeHandler`] so reconciliation can always start
/// at the file root.
#[derive(Debug, Clone, Copy)]
pub struct NodeHandlerFactory {
    root: NodeId,
}

impl NodeHandlerFactory {
    pub fn new(root: NodeId) -> Self {
        Self { root }
    }

    fn for_parent(&self, parent: NodeId, handler: Box<dyn NodeHandler>) -> Box<dyn NodeHandler> {
        if parent == self.root {
            handler
        } else {
            Box::new(ParentFinderReplacementNodeHandler::new(parent, handler))
        }
    }

    pub fn straight(&self) -> Box<dyn NodeHandler> {
        Box::new(StraightReplacementNodeHandler)
    }

    pub fn for_parent_range(&self, parent: NodeId, handler: RangeParentHandler) -> Box<dyn NodeHandler> {
        self.for_parent(parent, Box::new(handler))
    }

    pub fn for_range(
        &self,
        parent: NodeId,
        start: TextSize,
        end: TextSize,
        replacing_length: TextSize,
    ) -> Box<dyn NodeHandler> {
        let handler = RangeHandler::new(start, end).replacing_length(replacing_length);
        self.for_parent(parent, Box::new(handler))
    }

    pub fn for_child_index(&self, parent: NodeId, handler: DefaultParentHandler) -> Box<dyn NodeHandler> {
        self.for_parent(parent, Box::new(handler))
    }

    pub fn for_changing_child_order(
        &self,
        parent: NodeId,
        old_index: usize,
        new_index: usize,
    ) -> Box<dyn NodeHandler> {
        let handler = ChangeChildOrderParentHandler::new(old_index, new_index);
        self.for_parent(parent, Box::new(handler))
    }

    /// `parent` holds the unwrapped node at precise child `child_index`
    pub fn for_unwrapping_node(&self, parent: NodeId, child_index: usize) -> Box<dyn NodeHandler> {
        self.for_parent(parent, Box::new(UnwrapParentHandler::new(child_index)))
    }

    pub fn for_rename(&self) -> Box<dyn NodeHandler> {
        Box::new(RenameNodeHandler)
    }

    pub fn for_try_or_forget(&self, handler: Box<dyn NodeHandler>) -> Box<dyn NodeHandler> {
        Box::new(TryOrForgetNodeHandler::new(handler))
    }
}
