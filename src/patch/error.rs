use serde_json::Value;

use crate::{
    object::ObjectError,
    path::Spath,
    patch::PatchOp,
    resolve::ResolveError,
};

/// Failure of a single patch operation.
///
/// Every variant except [`PatchError::TestFailed`] is structural: the
/// document does not have the shape the operation needs.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("Failed to resolve path: {0}")]
    ResolveError(#[from] ResolveError),

    #[error("Cannot remove the root of the document")]
    CannotRemoveRoot,

    #[error("Cannot move a value into one of its own children")]
    CannotMoveIntoChild,

    #[error("Path {path} has no parent")]
    MissingParent { path: Spath },

    #[error("Path {path} does not end in a field or index")]
    MissingFinalToken { path: Spath },

    #[error("Path {path} uses {token:?} as an array index")]
    InvalidArrayIndexToken { path: Spath, token: String },

    #[error("Index {index} in {path} is out of bounds for an array of length {len}")]
    ArrayIndexOutOfBounds { path: Spath, index: usize, len: usize },

    #[error("Parent {parent} is {actual}, not an object or array")]
    NotAContainer { parent: Spath, actual: String },

    #[error("Nothing to remove at {path}")]
    TargetNotFound { path: Spath },

    #[error("Test failed at {path}: expected {expected}, found {actual}")]
    TestFailed {
        path: Spath,
        expected: Value,
        actual: Value,
    },
}

impl PatchError {
    pub fn missing_parent(path: &Spath) -> Self {
        PatchError::MissingParent { path: path.clone() }
    }

    pub fn missing_final_token(path: &Spath) -> Self {
        PatchError::MissingFinalToken { path: path.clone() }
    }

    pub fn invalid_array_index_token(path: &Spath, token: &str) -> Self {
        PatchError::InvalidArrayIndexToken {
            path: path.clone(),
            token: token.to_string(),
        }
    }

    pub fn index_out_of_bounds(path: &Spath, index: usize, len: usize) -> Self {
        PatchError::ArrayIndexOutOfBounds {
            path: path.clone(),
            index,
            len,
        }
    }

    pub fn not_a_container(parent: &Spath, actual: &str) -> Self {
        PatchError::NotAContainer {
            parent: parent.clone(),
            actual: actual.to_string(),
        }
    }

    pub fn target_not_found(path: &Spath) -> Self {
        PatchError::TargetNotFound { path: path.clone() }
    }

    pub fn test_failed(path: &Spath, expected: &Value, actual: &Value) -> Self {
        PatchError::TestFailed {
            path: path.clone(),
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }

    /// A `test` that did not hold, as opposed to a malformed document or path.
    pub fn is_predicate_failure(&self) -> bool {
        matches!(self, PatchError::TestFailed { .. })
    }
}

/// Failure of [`crate::patch::Patch::apply_to_object`].
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApplyError {
    #[error("step {step} ({op}) failed: {source}")]
    Operation {
        step: usize,
        op: PatchOp,
        #[source]
        source: PatchError,
    },

    #[error("patched document is no longer a valid object: {source}")]
    InvalidObject {
        #[source]
        source: ObjectError,
    },
}

/// The first step of a match that did not hold.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("match step {step} ({op}) did not hold: {source}")]
pub struct MatchFailure {
    pub step: usize,
    pub op: PatchOp,
    #[source]
    pub source: PatchError,
}
