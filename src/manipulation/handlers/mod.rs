//! Node handlers: reconcile an aligned (old wrapper, new element) pair.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator
//!     ↓ handle_node(root wrapper, new root)
//! TryOrForget ─┐                  (optional outer safety net)
//! ParentFinder ┤ straight replacement down to the changing parent
//!              ↓
//! edit-shaped handler (range, child count, order, unwrap, rename)
//!     ↓ remaining children
//! StraightReplacement             (kind equality, equal child counts)
//! ```
//!
//! Every handler ends by re-pointing the wrapper it was given at the new
//! element. Wrappers of old children are either re-pointed the same way or
//! forgotten, so no live wrapper keeps pointing into the old tree.

mod change_order;
mod default_parent;
mod factory;
mod parent_finder;
mod range;
mod range_parent;
mod rename;
mod straight;
mod try_or_forget;
mod unwrap;

pub use change_order::ChangeChildOrderParentHandler;
pub use default_parent::DefaultParentHandler;
pub use factory::NodeHandlerFactory;
pub use parent_finder::ParentFinderReplacementNodeHandler;
pub use range::RangeHandler;
pub use range_parent::RangeParentHandler;
pub use rename::RenameNodeHandler;
pub use straight::{StraightReplacementNodeHandler, straight_replace};
pub use try_or_forget::TryOrForgetNodeHandler;
pub use unwrap::UnwrapParentHandler;

use super::error::ReconcileError;
use crate::parser::SyntaxElement;
use crate::wrapper::{NodeCache, NodeId};

/// State shared by the handlers of one reconciliation
#[derive(Debug)]
pub struct ReconcileContext<'a> {
    pub cache: &'a mut NodeCache,
}

impl<'a> ReconcileContext<'a> {
    pub fn new(cache: &'a mut NodeCache) -> Self {
        Self { cache }
    }
}

pub trait NodeHandler {
    /// Reconcile the wrapper `current` with `new`, its counterpart in the
    /// freshly parsed tree
    fn handle_node(
        &mut self,
        cx: &mut ReconcileContext<'_>,
        current: NodeId,
        new: &SyntaxElement,
    ) -> Result<(), ReconcileError>;
}

/// Extra (wrapper, new element) pairs to migrate before normal recursion.
/// Receives the new counterpart of the handler's parent.
pub type CustomMappings = Box<dyn FnMut(&SyntaxElement) -> Vec<(NodeId, SyntaxElement)>>;

/// Hand an aligned pair to `handler` when the old element is wrapped.
///
/// An unwrapped element has no wrapped descendants either, so there is
/// nothing to migrate below it.
pub fn handle_for_values(
    handler: &mut dyn NodeHandler,
    cx: &mut ReconcileContext<'_>,
    current: &SyntaxElement,
    new: &SyntaxElement,
) -> Result<(), ReconcileError> {
    match cx.cache.get_existing(current) {
        Some(id) => handler.handle_node(cx, id, new),
        None => Ok(()),
    }
}

/// Forget the element's wrapper and everything cached below it
pub fn forget_if_wrapped(
    cx: &mut ReconcileContext<'_>,
    element: &SyntaxElement,
) -> Result<(), ReconcileError> {
    Ok(cx.cache.forget_element(element)?)
}

fn apply_custom_mappings(
    mappings: &mut Option<CustomMappings>,
    cx: &mut ReconcileContext<'_>,
    new_parent: &SyntaxElement,
) -> Result<(), ReconcileError> {
    if let Some(mappings) = mappings {
        for (id, element) in mappings(new_parent) {
            cx.cache.replace_identity(id, element)?;
        }
    }
    Ok(())
}

/// Take `element` out of `replacing`, forgetting it; false if it was not
/// expected to be replaced
fn try_replace_node(
    replacing: &mut Vec<SyntaxElement>,
    cx: &mut ReconcileContext<'_>,
    element: &SyntaxElement,
) -> Result<bool, ReconcileError> {
    match replacing.iter().position(|candidate| candidate == element) {
        Some(index) => {
            replacing.swap_remove(index);
            forget_if_wrapped(cx, element)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
