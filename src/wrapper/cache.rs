//! The identity cache: underlying element -> wrapper.
//!
//! Wrappers live in an append-only arena. A handle ([`NodeId`]) is an index
//! into that arena plus the owning file, so a forgotten wrapper keeps its
//! slot and every later access through its handle fails the same way.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

use super::variant::NodeVariant;
use crate::base::FileId;
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Handle to a wrapper node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    file: FileId,
    index: u32,
}

impl NodeId {
    pub fn file(self) -> FileId {
        self.file
    }
}

/// Misuse of a wrapper handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error(
        "Attempted to get information from a node that was removed or forgotten (last kind: {kind:?})"
    )]
    Forgotten { kind: SyntaxKind },
    #[error("Node handle belongs to {owner}, not {file}")]
    Foreign { owner: FileId, file: FileId },
}

/// One wrapper slot
#[derive(Debug, Clone)]
pub struct WrappedNode {
    element: SyntaxElement,
    variant: NodeVariant,
    forgotten: bool,
    tokens_inspected: bool,
}

impl WrappedNode {
    pub fn element(&self) -> &SyntaxElement {
        &self.element
    }

    pub fn kind(&self) -> SyntaxKind {
        self.element.kind()
    }

    pub fn variant(&self) -> NodeVariant {
        self.variant
    }

    /// Whether token-level children of this node were ever requested
    pub fn tokens_inspected(&self) -> bool {
        self.tokens_inspected
    }
}

/// Per-file map from underlying elements to their wrappers
#[derive(Debug)]
pub struct NodeCache {
    file: FileId,
    nodes: Vec<WrappedNode>,
    index: FxHashMap<SyntaxElement, u32>,
}

impl NodeCache {
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            nodes: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// Number of live (non-forgotten) wrappers
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn has_element(&self, element: &SyntaxElement) -> bool {
        self.index.contains_key(element)
    }

    pub fn get_existing(&self, element: &SyntaxElement) -> Option<NodeId> {
        self.index.get(element).map(|&index| self.id(index))
    }

    /// The live wrapper behind a handle
    pub fn wrapper(&self, id: NodeId) -> Result<&WrappedNode, NodeError> {
        let node = self.slot(id)?;
        if node.forgotten {
            return Err(NodeError::Forgotten { kind: node.kind() });
        }
        Ok(node)
    }

    pub fn element(&self, id: NodeId) -> Result<SyntaxElement, NodeError> {
        self.wrapper(id).map(|node| node.element.clone())
    }

    pub fn kind(&self, id: NodeId) -> Result<SyntaxKind, NodeError> {
        self.wrapper(id).map(WrappedNode::kind)
    }

    pub fn is_forgotten(&self, id: NodeId) -> bool {
        self.slot(id).is_ok_and(|node| node.forgotten)
    }

    /// Live wrappers in creation order
    pub fn live_ids(&self) -> Vec<NodeId> {
        let mut indices: Vec<u32> = self.index.values().copied().collect();
        indices.sort_unstable();
        indices.into_iter().map(|index| self.id(index)).collect()
    }

    /// Whether any direct child of the wrapped element has a wrapper
    pub fn has_wrapped_children(&self, id: NodeId) -> Result<bool, NodeError> {
        let wrapper = self.wrapper(id)?;
        Ok(match &wrapper.element {
            SyntaxElement::Node(node) => node
                .children_with_tokens()
                .any(|child| self.index.contains_key(&child)),
            SyntaxElement::Token(_) => false,
        })
    }

    /// Whether any direct token child of the wrapped element has a wrapper
    pub fn has_wrapped_tokens(&self, id: NodeId) -> Result<bool, NodeError> {
        let wrapper = self.wrapper(id)?;
        Ok(match &wrapper.element {
            SyntaxElement::Node(node) => self.node_has_wrapped_tokens(node),
            SyntaxElement::Token(_) => false,
        })
    }

    /// Wrappers of the element's descendants, in preorder
    pub fn cached_descendants(&self, id: NodeId) -> Result<Vec<NodeId>, NodeError> {
        let wrapper = self.wrapper(id)?;
        Ok(match &wrapper.element {
            SyntaxElement::Node(node) => node
                .descendants_with_tokens()
                .skip(1)
                .filter_map(|element| self.get_existing(&element))
                .collect(),
            SyntaxElement::Token(_) => Vec::new(),
        })
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Wrap an element, wrapping every unwrapped ancestor first so that the
    /// parent of a wrapped element is always wrapped
    pub fn get_or_create(&mut self, element: SyntaxElement) -> NodeId {
        if let Some(id) = self.get_existing(&element) {
            return id;
        }
        let missing: Vec<SyntaxElement> = element
            .parent()
            .into_iter()
            .flat_map(|parent| parent.ancestors())
            .map(SyntaxElement::Node)
            .take_while(|ancestor| !self.has_element(ancestor))
            .collect();
        for ancestor in missing.into_iter().rev() {
            self.create_detached(ancestor);
        }
        self.create_detached(element)
    }

    /// Wrap an element without touching its ancestors.
    ///
    /// Used during reconciliation, where ancestors are re-pointed by the
    /// ongoing walk.
    pub fn create_detached(&mut self, element: SyntaxElement) -> NodeId {
        if let Some(id) = self.get_existing(&element) {
            return id;
        }
        let tokens_inspected = match &element {
            SyntaxElement::Token(token) => {
                self.mark_parent_of_token(token);
                false
            }
            // a token re-pointed below a node created later still needs
            // token-level pairing under it
            SyntaxElement::Node(node) => self.node_has_wrapped_tokens(node),
        };
        let index = self.nodes.len() as u32;
        self.nodes.push(WrappedNode {
            variant: NodeVariant::of(element.kind()),
            element: element.clone(),
            forgotten: false,
            tokens_inspected,
        });
        self.index.insert(element, index);
        self.id(index)
    }

    /// Remember that token-level children of `id` were inspected
    pub fn mark_tokens_inspected(&mut self, id: NodeId) -> Result<(), NodeError> {
        self.wrapper(id)?;
        self.nodes[id.index as usize].tokens_inspected = true;
        Ok(())
    }

    // =========================================================================
    // Identity transfer and invalidation
    // =========================================================================

    /// Re-point a wrapper at an element of the new tree.
    ///
    /// Children are left alone: callers migrate or forget them separately. A
    /// different wrapper already owning `new_element` is forgotten.
    pub fn replace_identity(&mut self, id: NodeId, new_element: SyntaxElement) -> Result<(), NodeError> {
        let old_element = self.wrapper(id)?.element.clone();
        if old_element == new_element {
            return Ok(());
        }
        if let Some(previous) = self.get_existing(&new_element) {
            trace!(?previous, "forgetting wrapper displaced by identity transfer");
            self.forget(previous)?;
        }
        self.index.remove(&old_element);
        trace!(
            ?id,
            old = ?old_element.kind(),
            new = ?new_element.kind(),
            "replacing identity"
        );
        if let SyntaxElement::Token(token) = &new_element {
            self.mark_parent_of_token(token);
        }
        let slot = &mut self.nodes[id.index as usize];
        slot.variant = NodeVariant::of(new_element.kind());
        slot.element = new_element.clone();
        self.index.insert(new_element, id.index);
        Ok(())
    }

    /// Invalidate this wrapper only; forgetting an already forgotten wrapper
    /// is a no-op
    pub fn forget(&mut self, id: NodeId) -> Result<(), NodeError> {
        let slot = self.slot(id)?;
        if slot.forgotten {
            return Ok(());
        }
        let element = slot.element.clone();
        trace!(?id, kind = ?element.kind(), "forgetting node");
        self.index.remove(&element);
        self.nodes[id.index as usize].forgotten = true;
        Ok(())
    }

    /// Forget the cached descendants bottom-up, keeping the wrapper itself
    pub fn forget_descendants(&mut self, id: NodeId) -> Result<(), NodeError> {
        for descendant in self.cached_descendants(id)?.into_iter().rev() {
            self.forget(descendant)?;
        }
        Ok(())
    }

    /// Forget the cached descendants bottom-up, then the wrapper itself
    pub fn forget_subtree(&mut self, id: NodeId) -> Result<(), NodeError> {
        if self.is_forgotten(id) {
            return Ok(());
        }
        self.forget_descendants(id)?;
        self.forget(id)
    }

    /// Forget the element's wrapper and its cached descendants, if wrapped
    pub fn forget_element(&mut self, element: &SyntaxElement) -> Result<(), NodeError> {
        match self.get_existing(element) {
            Some(id) => self.forget_subtree(id),
            None => Ok(()),
        }
    }

    /// Forget every wrapper except `keep`
    pub fn forget_all_except(&mut self, keep: NodeId) {
        let doomed: Vec<u32> = self
            .index
            .values()
            .copied()
            .filter(|&index| index != keep.index)
            .collect();
        trace!(file = %self.file, count = doomed.len(), "forgetting all nodes but one");
        for index in doomed {
            let element = self.nodes[index as usize].element.clone();
            self.index.remove(&element);
            self.nodes[index as usize].forgotten = true;
        }
    }

    /// Forget every wrapper of the file
    pub fn forget_all(&mut self) {
        trace!(file = %self.file, count = self.index.len(), "forgetting all nodes");
        for (_, index) in self.index.drain() {
            self.nodes[index as usize].forgotten = true;
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn mark_parent_of_token(&mut self, token: &SyntaxToken) {
        let parent = token.parent().map(SyntaxElement::Node);
        if let Some(parent_id) = parent.and_then(|p| self.get_existing(&p)) {
            self.nodes[parent_id.index as usize].tokens_inspected = true;
        }
    }

    fn node_has_wrapped_tokens(&self, node: &SyntaxNode) -> bool {
        node.children_with_tokens()
            .any(|child| child.as_token().is_some() && self.index.contains_key(&child))
    }

    fn id(&self, index: u32) -> NodeId {
        NodeId {
            file: self.file,
            index,
        }
    }

    fn slot(&self, id: NodeId) -> Result<&WrappedNode, NodeError> {
        if id.file != self.file {
            return Err(NodeError::Foreign {
                owner: id.file,
                file: self.file,
            });
        }
        self.nodes.get(id.index as usize).ok_or(NodeError::Foreign {
            owner: id.file,
            file: self.file,
        })
    }
}
