use serde_json::Value;

use crate::{
    patch::PatchError,
    path::{Segment, Spath},
    resolve::{ResolveError, array_index, element_matches, resolve_mut, value_type_desc},
};

/// RFC 6902 "remove". The target must exist; later array elements shift
/// left. A trailing filter segment removes the matching array element.
pub fn remove(doc: &mut Value, path: Spath) -> Result<(), PatchError> {
    let Some(segment) = path.last_segment() else {
        return Err(PatchError::CannotRemoveRoot);
    };
    let parent = path.parent().ok_or(PatchError::missing_parent(&path))?;

    match resolve_mut(doc, &parent)? {
        Value::Object(map) => {
            let field = path.field().ok_or(PatchError::missing_final_token(&path))?;
            map.remove(&field)
                .ok_or(PatchError::target_not_found(&path))?;
        }
        Value::Array(arr) => {
            let index = match segment {
                Segment::Field(field) => array_index(field)
                    .ok_or_else(|| PatchError::invalid_array_index_token(&path, field))?,
                Segment::Filter(conditions) => arr
                    .iter()
                    .position(|item| element_matches(item, conditions))
                    .ok_or(PatchError::ResolveError(ResolveError::NotFound))?,
            };

            if index >= arr.len() {
                return Err(PatchError::index_out_of_bounds(&path, index, arr.len()));
            }
            arr.remove(index);
        }
        val => {
            return Err(PatchError::not_a_container(&parent, &value_type_desc(val)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;

    fn path(raw: &str) -> Spath {
        raw.try_into().unwrap()
    }

    #[test]
    fn remove_root_fails() {
        let mut doc = json!({"kind": "Service"});

        let_assert!(Err(PatchError::CannotRemoveRoot) = remove(&mut doc, path("")));
    }

    #[test]
    fn remove_existing_label() {
        let mut doc = json!({"metadata": {"labels": {"name": "querier", "team": "mimir"}}});

        remove(&mut doc, path("/metadata/labels/team")).unwrap();

        check!(doc == json!({"metadata": {"labels": {"name": "querier"}}}));
    }

    #[test]
    fn remove_missing_label_fails() {
        let mut doc = json!({"metadata": {"labels": {"app.kubernetes.io/name": "mimir"}}});

        let_assert!(
            Err(PatchError::TargetNotFound { path: p }) =
                remove(&mut doc, path("/metadata/labels/name"))
        );
        check!(p == path("/metadata/labels/name"));
        check!(doc == json!({"metadata": {"labels": {"app.kubernetes.io/name": "mimir"}}}));
    }

    #[test]
    fn remove_with_missing_parent_fails() {
        let mut doc = json!({"metadata": {}});

        let_assert!(
            Err(PatchError::ResolveError(ResolveError::NotFound)) =
                remove(&mut doc, path("/metadata/labels/name"))
        );
    }

    #[test]
    fn remove_array_element_shifts_left() {
        let mut doc = json!({"args": ["-a", "-b", "-c"]});

        remove(&mut doc, path("/args/0")).unwrap();

        check!(doc == json!({"args": ["-b", "-c"]}));
    }

    #[test]
    fn remove_past_array_end_fails() {
        let mut doc = json!({"args": ["-a"]});

        let_assert!(
            Err(PatchError::ArrayIndexOutOfBounds { index, len, .. }) =
                remove(&mut doc, path("/args/1"))
        );
        check!(index == 1);
        check!(len == 1);
    }

    #[test]
    fn remove_with_field_token_on_array_fails() {
        let mut doc = json!({"args": ["-a"]});

        let_assert!(
            Err(PatchError::InvalidArrayIndexToken { token, .. }) =
                remove(&mut doc, path("/args/first"))
        );
        check!(token == "first");
    }

    #[test]
    fn remove_rejects_padded_or_signed_index() {
        let mut doc = json!({"args": ["-a", "-b"]});

        for token in ["01", "+0"] {
            let_assert!(
                Err(PatchError::InvalidArrayIndexToken { .. }) =
                    remove(&mut doc, path(&format!("/args/{token}")))
            );
        }
        check!(doc == json!({"args": ["-a", "-b"]}));
    }

    #[test]
    fn remove_under_scalar_fails() {
        let mut doc = json!({"spec": {"replicas": 1}});

        let_assert!(
            Err(PatchError::NotAContainer { parent, actual }) =
                remove(&mut doc, path("/spec/replicas/0"))
        );
        check!(parent == path("/spec/replicas"));
        check!(actual == "number(1)");
    }

    #[test]
    fn remove_array_element_by_filter() {
        let mut doc = json!({"containers": [
            {"name": "querier", "image": "mimir"},
            {"name": "sidecar", "image": "busybox"}
        ]});

        remove(&mut doc, path("/containers/[name=sidecar]")).unwrap();

        check!(doc == json!({"containers": [{"name": "querier", "image": "mimir"}]}));
    }

    #[test]
    fn remove_field_inside_filtered_element() {
        let mut doc = json!({"containers": [
            {"name": "querier", "image": "mimir", "tty": true}
        ]});

        remove(&mut doc, path("/containers/[name=querier]/tty")).unwrap();

        check!(doc == json!({"containers": [{"name": "querier", "image": "mimir"}]}));
    }

    #[test]
    fn remove_by_filter_without_match_fails() {
        let mut doc = json!({"containers": [{"name": "querier"}]});

        let_assert!(
            Err(PatchError::ResolveError(ResolveError::NotFound)) =
                remove(&mut doc, path("/containers/[name=ruler]"))
        );
        check!(doc == json!({"containers": [{"name": "querier"}]}));
    }

    #[test]
    fn remove_escaped_keys() {
        let mut doc = json!({"a/b": {"c~d": 1}, "e": 2});

        remove(&mut doc, path("/a~1b/c~0d")).unwrap();

        check!(doc == json!({"a/b": {}, "e": 2}));
    }
}
