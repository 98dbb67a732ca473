use serde_json::Value;

use crate::{
    patch::{PatchError, add, remove},
    path::Spath,
    resolve::resolve_ref,
};

/// RFC 6902 "move": "remove" at `from` followed by "add" at `path`.
///
/// `from` must exist and must not be a proper prefix of `path`. Both halves
/// run on a scratch copy so a failing "add" leaves `doc` untouched.
pub fn move_op(doc: &mut Value, from: Spath, path: Spath) -> Result<(), PatchError> {
    let value = resolve_ref(doc, &from)?.clone();

    if from.is_parent_of(&path) {
        return Err(PatchError::CannotMoveIntoChild);
    }

    let mut scratch = doc.clone();
    remove(&mut scratch, from)?;
    add(&mut scratch, path, value)?;
    *doc = scratch;

    Ok(())
}
