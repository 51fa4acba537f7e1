//! Manipulation: edits on immutable, fully reparsed trees.
//!
//! An edit is a [`TextManipulator`] (how the text changes) paired with a
//! [`NodeHandler`] (how wrappers follow the change). The [`Orchestrator`]
//! runs both and turns any failure into a [`ManipulationError`].
//!
//! ```text
//! old text ──TextManipulator──► new text ──ParserOracle──► new tree
//!                                                            │
//! NodeCache ◄──────────── NodeHandler(root wrapper, new root)┘
//! ```

pub mod error;
pub mod handlers;
pub mod iter;
pub mod orchestrator;
pub mod settings;
pub mod text;

pub use error::{ManipulationError, ReconcileError, format_diagnostics};
pub use handlers::{
    ChangeChildOrderParentHandler, CustomMappings, DefaultParentHandler, NodeHandler,
    NodeHandlerFactory, ParentFinderReplacementNodeHandler, RangeHandler, RangeParentHandler,
    ReconcileContext, RenameNodeHandler, StraightReplacementNodeHandler, TryOrForgetNodeHandler,
    UnwrapParentHandler,
};
pub use iter::{ChildIter, ChildMode};
pub use orchestrator::{ManipulationTarget, Orchestrator};
pub use settings::ManipulationSettings;
pub use text::{
    FullReplacementTextManipulator, InsertionTextManipulator, RenameLocation,
    RenameLocationTextManipulator, TextManipulator, UnwrapTextManipulator,
};
