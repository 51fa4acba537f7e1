use super::{
    CustomMappings, NodeHandler, ReconcileContext, StraightReplacementNodeHandler,
    apply_custom_mappings, forget_if_wrapped, handle_for_values, try_replace_node,
};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::iter::{ChildMode, child_iters};
use crate::parser::SyntaxElement;
use crate::wrapper::NodeId;

/// Decides whether an old child (with its index) is the first one affected
pub type FirstChildPredicate = Box<dyn Fn(&SyntaxElement, usize) -> bool>;

/// Reconciles a parent that gained (`child_count > 0`) or lost
/// (`child_count < 0`) children starting at a known position
pub struct DefaultParentHandler {
    child_count: isize,
    is_first_child: FirstChildPredicate,
    replacing_nodes: Vec<SyntaxElement>,
    custom_mappings: Option<CustomMappings>,
}

impl DefaultParentHandler {
    pub fn new(child_count: isize, is_first_child: FirstChildPredicate) -> Self {
        Self {
            child_count,
            is_first_child,
            replacing_nodes: Vec::new(),
            custom_mappings: None,
        }
    }

    /// Affected children start at precise child `index`
    pub fn at_index(child_count: isize, index: usize) -> Self {
        Self::new(child_count, Box::new(move |_, i| i == index))
    }

    pub fn replacing_nodes(mut self, nodes: Vec<SyntaxElement>) -> Self {
        self.replacing_nodes = nodes;
        self
    }

    pub fn custom_mappings(mut self, mappings: CustomMappings) -> Self {
        self.custom_mappings = Some(mappings);
        self
    }
}

impl NodeHandler for DefaultParentHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        let (mut current_children, mut new_children) =
            child_iters(ChildMode::Precise, &cx.cache.element(current)?, new);

        apply_custom_mappings(&mut self.custom_mappings, cx, new)?;

        let mut index = 0;
        while !new_children.done() {
            match current_children.peek() {
                Some(child) if !(self.is_first_child)(child, index) => {}
                _ => break,
            }
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            handle_for_values(&mut StraightReplacementNodeHandler, cx, &current_child, &new_child)?;
            index += 1;
        }

        while let Some(child) = current_children.peek().cloned() {
            if !try_replace_node(&mut self.replacing_nodes, cx, &child)? {
                break;
            }
            current_children.next();
        }

        if self.child_count > 0 {
            for _ in 0..self.child_count {
                new_children.next_or_leftover("current")?;
            }
        } else {
            for _ in 0..self.child_count.unsigned_abs() {
                let removed = current_children.next_or_leftover("new")?;
                forget_if_wrapped(cx, &removed)?;
            }
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
