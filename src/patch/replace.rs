use serde_json::Value;

use crate::{patch::PatchError, path::Spath, resolve::resolve_mut};

/// RFC 6902 "replace". Unlike "add", the target must already exist.
pub fn replace(doc: &mut Value, path: Spath, value: Value) -> Result<(), PatchError> {
    let target = resolve_mut(doc, &path)?;
    *target = value;
    Ok(())
}
