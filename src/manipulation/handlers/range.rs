use super::{
    NodeHandler, ReconcileContext, StraightReplacementNodeHandler, forget_if_wrapped,
    handle_for_values,
};
use crate::manipulation::error::ReconcileError;
use crate::manipulation::iter::{ChildMode, child_iters};
use crate::parser::{SyntaxElement, TextRange, TextSize};
use crate::wrapper::NodeId;

/// Reconciles a text edit anywhere below the node it starts at.
///
/// `[start, end)` is the inserted text in new coordinates and
/// `replacing_length` the length of the text it replaced. At each level the
/// handler descends into the one child holding the whole edit on both
/// sides. Otherwise every child the edit touches is forgotten (old side) or
/// left unwrapped (new side), and the children after it are paired again.
#[derive(Debug, Clone)]
pub struct RangeHandler {
    start: TextSize,
    end: TextSize,
    replacing_length: TextSize,
}

impl RangeHandler {
    pub fn new(start: TextSize, end: TextSize) -> Self {
        Self {
            start,
            end,
            replacing_length: TextSize::new(0),
        }
    }

    pub fn replacing_length(mut self, length: TextSize) -> Self {
        self.replacing_length = length;
        self
    }

    fn replacing_end(&self) -> TextSize {
        self.start + self.replacing_length
    }

    /// Whether the edit lies wholly inside this pair of children
    fn holds_edit(&self, current: &SyntaxElement, new: &SyntaxElement) -> bool {
        if current.as_node().is_none() || current.kind() != new.kind() {
            return false;
        }
        let old_range = current.text_range();
        let new_range = new.text_range();
        let replaced = TextRange::new(self.start, self.replacing_end());
        let inserted = TextRange::new(self.start, self.end);
        if !old_range.contains_range(replaced) || !new_range.contains_range(inserted) {
            return false;
        }
        if !replaced.is_empty() && old_range == replaced {
            return false;
        }
        old_range.start() < self.start || new_range.end() > self.end || old_range.is_empty()
    }
}

impl NodeHandler for RangeHandler {
    fn handle_node(
        &mut self,
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
        let mode = ChildMode::for_wrapper(cx.cache, current)?;
        let (mut current_children, mut new_children) =
            child_iters(mode, &cx.cache.element(current)?, new);
        let replacing_end = self.replacing_end();

        // children ending before the edit, on both sides
        while current_children
            .peek()
            .is_some_and(|child| child.text_range().end() <= self.start)
            && new_children
                .peek()
                .is_some_and(|child| child.text_range().end() <= self.start)
        {
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            handle_for_values(&mut StraightReplacementNodeHandler, cx, &current_child, &new_child)?;
        }

        let descend = match (current_children.peek(), new_children.peek()) {
            (Some(current_child), Some(new_child)) => self.holds_edit(current_child, new_child),
            _ => false,
        };
        if descend {
            let current_child = current_children.next_or_leftover("new")?;
            let new_child = new_children.next_or_leftover("current")?;
            handle_for_values(self, cx, &current_child, &new_child)?;
        } else {
            // Children touched by the edit. A child reaching past the edit
            // on one side widens the touched span on the other, so both
            // sides are consumed until neither grows.
            let mut touched_end = replacing_end;
            loop {
                let mut grew = false;
                while current_children
                    .peek()
                    .is_some_and(|child| child.text_range().start() < touched_end)
                {
                    let removed = current_children.next_or_leftover("new")?;
                    touched_end = touched_end.max(removed.text_range().end());
                    forget_if_wrapped(cx, &removed)?;
                    grew = true;
                }
                let new_touched_end = touched_end - replacing_end + self.end;
                while new_children
                    .peek()
                    .is_some_and(|child| child.text_range().start() < new_touched_end)
                {
                    let inserted = new_children.next_or_leftover("current")?;
                    let inserted_end = inserted.text_range().end();
                    if inserted_end > self.end {
                        touched_end = touched_end.max(inserted_end - self.end + replacing_end);
                    }
                    grew = true;
                }
                if !grew {
                    break;
                }
            }
        }

        // children after the edit
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
