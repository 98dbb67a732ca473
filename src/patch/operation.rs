use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    patch::{PatchError, add, copy, move_op, remove, replace, test},
    path::Spath,
};

/// One RFC 6902 operation, (de)serialized in its standard
/// `{"op": ..., "path": ..., ...}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: Spath, value: Value },
    Remove { path: Spath },
    Replace { path: Spath, value: Value },
    Move { from: Spath, path: Spath },
    Copy { from: Spath, path: Spath },
    Test { path: Spath, value: Value },
}

impl PatchOp {
    pub fn add(path: Spath, value: Value) -> Self {
        PatchOp::Add { path, value }
    }

    pub fn remove(path: Spath) -> Self {
        PatchOp::Remove { path }
    }

    pub fn replace(path: Spath, value: Value) -> Self {
        PatchOp::Replace { path, value }
    }

    pub fn move_op(from: Spath, path: Spath) -> Self {
        PatchOp::Move { from, path }
    }

    pub fn copy(from: Spath, path: Spath) -> Self {
        PatchOp::Copy { from, path }
    }

    pub fn test(path: Spath, value: Value) -> Self {
        PatchOp::Test { path, value }
    }

    pub fn path(&self) -> &Spath {
        match self {
            PatchOp::Add { path, .. }
            | PatchOp::Remove { path }
            | PatchOp::Replace { path, .. }
            | PatchOp::Move { path, .. }
            | PatchOp::Copy { path, .. }
            | PatchOp::Test { path, .. } => path,
        }
    }

    /// Applies the operation to `doc` in place.
    ///
    /// On error `doc` is left as it was.
    pub fn apply(&self, doc: &mut Value) -> Result<(), PatchError> {
        match self {
            PatchOp::Add { path, value } => add(doc, path.clone(), value.clone()),
            PatchOp::Remove { path } => remove(doc, path.clone()),
            PatchOp::Replace { path, value } => replace(doc, path.clone(), value.clone()),
            PatchOp::Move { from, path } => move_op(doc, from.clone(), path.clone()),
            PatchOp::Copy { from, path } => copy(doc, from.clone(), path.clone()),
            PatchOp::Test { path, value } => test(doc, path, value),
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOp::Add { path, value } => write!(f, "add {path}: {value}"),
            PatchOp::Remove { path } => write!(f, "remove {path}"),
            PatchOp::Replace { path, value } => write!(f, "replace {path}: {value}"),
            PatchOp::Move { from, path } => write!(f, "move {path} from {from}"),
            PatchOp::Copy { from, path } => write!(f, "copy {path} from {from}"),
            PatchOp::Test { path, value } => write!(f, "test {path}: {value}"),
        }
    }
}
