//! Wrapper nodes: long-lived handles over elements of a changing tree.
//!
//! ```text
//! NodeId (Copy handle) ──► NodeCache slot ──► SyntaxElement of the live snapshot
//!                                  │
//!                                  └── NodeVariant (looked up from the kind)
//! ```
//!
//! Handles never dangle: a forgotten wrapper keeps its slot and every later
//! access through it returns [`NodeError::Forgotten`].

mod cache;
mod variant;

pub use cache::{NodeCache, NodeError, NodeId, WrappedNode};
pub use variant::{
    NodeVariant, body, child_syntax_list, initializer, is_bodied, name_node, property_name_node,
};
