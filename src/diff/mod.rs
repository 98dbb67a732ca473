mod engine;

use serde_json::Value;

use crate::{patch::Patch, path::Spath};

/// Computes the operations that turn `left` into `right`.
///
/// Only `add`, `remove` and `replace` are emitted, and applying the result to
/// `left` yields `right`. Equal inputs produce an empty patch.
pub fn diff(left: &Value, right: &Value) -> Patch {
    let mut patch_ops = Patch::default();
    let mut path_pos = Spath::default();

    engine::diff_recursive(left, right, &mut path_pos, &mut patch_ops);

    patch_ops
}
