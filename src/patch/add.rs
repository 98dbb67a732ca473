use serde_json::Value;

use crate::{
    patch::PatchError,
    path::Spath,
    resolve::{array_index, resolve_mut, value_type_desc},
};

/// RFC 6902 "add".
///
/// - An empty path replaces the whole document.
/// - On an object the member is inserted, replacing any existing value.
/// - On an array the value is inserted at the index, shifting later elements
///   to the right. The index may equal the length, and `-` appends.
///
/// The parent of the target must already exist and be a container.
pub fn add(doc: &mut Value, path: Spath, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }

    let parent = path.parent().ok_or(PatchError::missing_parent(&path))?;
    let field = path.field().ok_or(PatchError::missing_final_token(&path))?;

    match resolve_mut(doc, &parent)? {
        Value::Object(obj) => {
            obj.insert(field, value);
        }
        Value::Array(arr) if field == "-" => arr.push(value),
        Value::Array(arr) => {
            let index = array_index(&field)
                .ok_or_else(|| PatchError::invalid_array_index_token(&path, &field))?;

            if index > arr.len() {
                return Err(PatchError::index_out_of_bounds(&path, index, arr.len()));
            }
            arr.insert(index, value);
        }
        val => {
            return Err(PatchError::not_a_container(&parent, &value_type_desc(val)));
        }
    }

    Ok(())
}
