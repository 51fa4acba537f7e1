//! Lockstep iteration over the children of an old and a new element.

use std::iter::Peekable;
use std::vec::IntoIter;

use super::error::ReconcileError;
use crate::parser::SyntaxElement;
use crate::wrapper::{NodeCache, NodeId};

/// Peekable one-element-lookahead sequence over one element's children
#[derive(Debug)]
pub struct ChildIter {
    inner: Peekable<IntoIter<SyntaxElement>>,
    side: &'static str,
}

impl ChildIter {
    pub fn new(children: Vec<SyntaxElement>, side: &'static str) -> Self {
        Self {
            inner: children.into_iter().peekable(),
            side,
        }
    }

    pub fn peek(&mut self) -> Option<&SyntaxElement> {
        self.inner.peek()
    }

    pub fn done(&mut self) -> bool {
        self.inner.peek().is_none()
    }

    /// Advance, treating exhaustion as an alignment violation
    pub fn next_or_leftover(&mut self, other_side: &'static str) -> Result<SyntaxElement, ReconcileError> {
        self.inner
            .next()
            .ok_or(ReconcileError::LeftoverChildren { side: other_side })
    }

    /// Fail if anything is left on this side
    pub fn ensure_done(&mut self) -> Result<(), ReconcileError> {
        if self.done() {
            Ok(())
        } else {
            Err(ReconcileError::LeftoverChildren { side: self.side })
        }
    }

    pub fn side(&self) -> &'static str {
        self.side
    }
}

impl Iterator for ChildIter {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// How children of an aligned pair are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildMode {
    /// Child nodes only
    Fast,
    /// Every non-trivia child element, tokens included
    Precise,
}

impl ChildMode {
    /// Precise once the wrapper's tokens were ever inspected or while one
    /// of its tokens is wrapped, fast otherwise
    pub fn for_wrapper(cache: &NodeCache, id: NodeId) -> Result<Self, ReconcileError> {
        Ok(if cache.wrapper(id)?.tokens_inspected() || cache.has_wrapped_tokens(id)? {
            Self::Precise
        } else {
            Self::Fast
        })
    }

    pub fn children(self, element: &SyntaxElement) -> Vec<SyntaxElement> {
        match self {
            Self::Fast => fast_children(element),
            Self::Precise => precise_children(element),
        }
    }
}

/// Every non-trivia child element in source order
pub fn precise_children(element: &SyntaxElement) -> Vec<SyntaxElement> {
    match element {
        SyntaxElement::Node(node) => node
            .children_with_tokens()
            .filter(|child| !child.kind().is_trivia())
            .collect(),
        SyntaxElement::Token(_) => Vec::new(),
    }
}

/// Child nodes in source order
pub fn fast_children(element: &SyntaxElement) -> Vec<SyntaxElement> {
    match element {
        SyntaxElement::Node(node) => node.children().map(SyntaxElement::Node).collect(),
        SyntaxElement::Token(_) => Vec::new(),
    }
}

/// Iterators over the children of an aligned pair, in the given mode
pub fn child_iters(
    mode: ChildMode,
    current: &SyntaxElement,
    new: &SyntaxElement,
) -> (ChildIter, ChildIter) {
    (
        ChildIter::new(mode.children(current), "current"),
        ChildIter::new(mode.children(new), "new"),
    )
}
