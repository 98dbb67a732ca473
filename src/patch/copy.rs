use serde_json::Value;

use crate::{
    patch::{PatchError, add},
    path::Spath,
    resolve::resolve_ref,
};

/// RFC 6902 "copy": an "add" at `path` of the value found at `from`, which
/// must exist.
pub fn copy(doc: &mut Value, from: Spath, path: Spath) -> Result<(), PatchError> {
    let value = resolve_ref(doc, &from)?.clone();

    add(doc, path, value)
}
