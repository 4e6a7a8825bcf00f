//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

/// Structural errors raised by tree mutations.
///
/// Lookups never produce these: a missing node is `None`, not an error.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("node not found: {0:?}")]
    NodeNotFound(Index),

    #[error("node already attached to a parent: {label}")]
    AlreadyAttached { label: String },

    #[error("attaching {label} would create a cycle")]
    CycleDetected { label: String },

    #[error("duplicate sibling label: {label}")]
    DuplicateLabel { label: String },

    #[error("invalid path segment {segment:?}: {reason}")]
    InvalidPath { segment: String, reason: String },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
