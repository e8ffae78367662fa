//! Error types for hierarchy editing.

use thiserror::Error;

/// Errors raised while building or editing a [`HierarchyTree`](crate::HierarchyTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A bone with this name is already in the tree.
    #[error("bone {0:?} already exists")]
    DuplicateBone(String),

    /// No bone with this name is in the tree.
    #[error("unknown bone {0:?}")]
    UnknownBone(String),

    /// The requested parent is the bone itself or one of its descendants.
    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle { child: String, parent: String },
}

/// Result type for hierarchy operations.
pub type Result<T> = std::result::Result<T, Error>;
