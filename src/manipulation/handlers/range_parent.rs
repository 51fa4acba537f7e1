use super::{
    CustomMappings, NodeHandler, ReconcileContext, StraightReplacementNodeHandler,
    apply_custom_mappings, forget_if_wrapped, handle_for_values, try_replace_node,
};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::iter::{ChildMode, child_iters};
use crate::parser::{SyntaxElement, TextSize};
use crate::wrapper::NodeId;

/// Reconciles a parent whose children changed within `[start, end)` of the
/// new text.
///
/// New children fully inside the range are new syntax and get no wrapper.
/// With a replacing length, the old children overlapping
/// `[start, start + replacing_length)` are migrated onto the new ones when
/// both sides match kind for kind, and forgotten otherwise.
pub struct RangeParentHandler {
    start: TextSize,
    end: TextSize,
    replacing_length: Option<TextSize>,
    replacing_nodes: Vec<SyntaxElement>,
    custom_mappings: Option<CustomMappings>,
}

impl RangeParentHandler {
    pub fn new(start: TextSize, end: TextSize) -> Self {
        Self {
            start,
            end,
            replacing_length: None,
            replacing_nodes: Vec::new(),
            custom_mappings: None,
        }
    }

    pub fn replacing_length(mut self, length: TextSize) -> Self {
        self.replacing_length = Some(length);
        self
    }

    /// Old elements to forget even where they would otherwise be migrated
    pub fn replacing_nodes(mut self, nodes: Vec<SyntaxElement>) -> Self {
        self.replacing_nodes = nodes;
        self
    }

    pub fn custom_mappings(mut self, mappings: CustomMappings) -> Self {
        self.custom_mappings = Some(mappings);
        self
    }

    fn straight_replace(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: &SyntaxElement,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        if try_replace_node(&mut self.replacing_nodes, cx, current)? {
            return Ok(());
        }
        handle_for_values(&mut StraightReplacementNodeHandler, cx, current, new)
    }

    fn replace_span(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        old_nodes: Vec<SyntaxElement>,
        new_nodes: &[SyntaxElement],
    ) -> Result<(), ReconcileError> {
        let same_shape = old_nodes.len() == new_nodes.len()
            && old_nodes
                .iter()
                .zip(new_nodes)
                .all(|(old, new)| old.kind() == new.kind());
        for (i, old) in old_nodes.iter().enumerate() {
            let forced = try_replace_node(&mut self.replacing_nodes, cx, old)?;
            if forced {
                continue;
            }
            match cx.cache.get_existing(old) {
                Some(id) if same_shape => {
                    cx.cache.forget_descendants(id)?;
                    cx.cache.replace_identity(id, new_nodes[i].clone())?;
                }
                _ => forget_if_wrapped(cx, old)?,
            }
        }
        Ok(())
    }
}

impl NodeHandler for RangeParentHandler {
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError> {
        apply_custom_mappings(&mut self.custom_mappings, cx, new)?;
        let mode = ChildMode::for_wrapper(cx.cache, current)?;
        let (mut current_children, mut new_children) =
            child_iters(mode, &cx.cache.element(current)?, new);

        // children before the edit
        while !current_children.done()
            && new_children
                .peek()
                .is_some_and(|child| child.text_range().start() < self.start)
        {
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            self.straight_replace(cx, &current_child, &new_child)?;
        }

        // the inserted children
        let mut new_nodes = Vec::new();
        while let Some(child) = new_children.peek() {
            let range = child.text_range();
            if range.start() < self.start || range.end() > self.end {
                break;
            }
            new_nodes.extend(new_children.next());
        }

        if let Some(replacing_length) = self.replacing_length {
            let replacing_end = self.start + replacing_length;
            let mut old_nodes = Vec::new();
            while let Some(child) = current_children.peek() {
                let range = child.text_range();
                if range.start() >= replacing_end && range.end() > replacing_end {
                    break;
                }
                old_nodes.extend(current_children.next());
            }
            self.replace_span(cx, old_nodes, &new_nodes)?;
        }

        // children after the edit
        while !current_children.done() {
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            self.straight_replace(cx, &current_child, &new_child)?;
        }
        new_children.ensure_done()?;

        cx.cache.replace_identity(current, new.clone())?;
        Ok(())
    }
}
