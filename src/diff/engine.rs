use serde_json::{Map, Value};

use crate::{
    patch::{Patch, PatchOp},
    path::Spath,
};

pub(super) fn diff_recursive(
    left: &Value,
    right: &Value,
    path_pos: &mut Spath,
    patch_ops: &mut Patch,
) {
    match (left, right) {
        (Value::Object(left_map), Value::Object(right_map)) => {
            diff_object(left_map, right_map, path_pos, patch_ops)
        }
        (Value::Array(left_array), Value::Array(right_array)) => {
            diff_array(left_array, right_array, path_pos, patch_ops)
        }
        (left, right) if left == right => {}
        (_, right) => patch_ops.push(PatchOp::replace(path_pos.clone(), right.clone())),
    }
}

fn diff_object(
    left_map: &Map<String, Value>,
    right_map: &Map<String, Value>,
    path_pos: &mut Spath,
    patch_ops: &mut Patch,
) {
    for (key, right_value) in right_map {
        path_pos.push_field(key.as_str());
        match left_map.get(key) {
            Some(left_value) => diff_recursive(left_value, right_value, path_pos, patch_ops),
            None => patch_ops.push(PatchOp::add(path_pos.clone(), right_value.clone())),
        }
        path_pos.pop();
    }

    for key in left_map.keys() {
        if !right_map.contains_key(key) {
            path_pos.push_field(key.as_str());
            patch_ops.push(PatchOp::remove(path_pos.clone()));
            path_pos.pop();
        }
    }
}

/// Position-wise comparison: shared indices are diffed recursively, extra
/// right elements are added in order and surplus left elements are removed
/// from the back so every emitted index is valid when applied in sequence.
fn diff_array(left: &[Value], right: &[Value], path_pos: &mut Spath, patch_ops: &mut Patch) {
    let common = left.len().min(right.len());

    for (index, (left_item, right_item)) in left.iter().zip(right).enumerate() {
        path_pos.push_index(index);
        diff_recursive(left_item, right_item, path_pos, patch_ops);
        path_pos.pop();
    }

    for (index, right_item) in right.iter().enumerate().skip(common) {
        path_pos.push_index(index);
        patch_ops.push(PatchOp::add(path_pos.clone(), right_item.clone()));
        path_pos.pop();
    }

    for index in (common..left.len()).rev() {
        path_pos.push_index(index);
        patch_ops.push(PatchOp::remove(path_pos.clone()));
        path_pos.pop();
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;
    use crate::test_util::path;

    fn run(left: &Value, right: &Value) -> Patch {
        let mut path_pos = Spath::default();
        let mut patch_ops = Patch::default();
        diff_recursive(left, right, &mut path_pos, &mut patch_ops);
        check!(path_pos == Spath::default());
        patch_ops
    }

    #[test]
    fn equal_scalars_produce_nothing() {
        check!(run(&json!("foo"), &json!("foo")) == Patch::default());
    }

    #[test]
    fn different_scalars_replace_at_root() {
        check!(
            run(&json!("foo"), &json!("bar"))
                == Patch::new(vec![PatchOp::replace(Spath::default(), json!("bar"))])
        );
    }

    #[test]
    fn type_change_replaces_whole_value() {
        check!(
            run(&json!({"a": "foo"}), &json!({"a": {"b": 1}}))
                == Patch::new(vec![PatchOp::replace(path("/a"), json!({"b": 1}))])
        );
    }

    #[test]
    fn changed_label_is_a_nested_replace() {
        let left = json!({"metadata": {"labels": {"name": "querier-left"}}});
        let right = json!({"metadata": {"labels": {"name": "querier-right"}}});

        check!(
            run(&left, &right)
                == Patch::new(vec![PatchOp::replace(
                    path("/metadata/labels/name"),
                    json!("querier-right")
                )])
        );
    }

    #[test]
    fn missing_member_is_removed() {
        check!(
            run(&json!({"foo": 43, "bar": 1}), &json!({"foo": 43}))
                == Patch::new(vec![PatchOp::remove(path("/bar"))])
        );
    }

    #[test]
    fn new_member_is_added() {
        check!(
            run(&json!({"foo": 43}), &json!({"foo": 43, "bar": 1}))
                == Patch::new(vec![PatchOp::add(path("/bar"), json!(1))])
        );
    }

    #[test]
    fn escaped_keys_survive_in_paths() {
        let left = json!({"annotations": {}});
        let right = json!({"annotations": {"prometheus.io/port": "8080"}});

        check!(
            run(&left, &right)
                == Patch::new(vec![PatchOp::add(
                    path("/annotations/prometheus.io~1port"),
                    json!("8080")
                )])
        );
    }

    #[test]
    fn bracketed_keys_reapply_after_serialization() {
        let left = json!({"data": {}});
        let right = json!({"data": {"[name=x]": 1, "key[0]": 2}});

        let patch = run(&left, &right);
        let encoded = serde_json::to_string(&patch).unwrap();
        let decoded: Patch = serde_json::from_str(&encoded).unwrap();

        check!(encoded.contains(r#""path":"/data/~2name=x]""#));
        check!(decoded == patch);
        check!(decoded.apply(&left) == Ok(right));
    }

    #[test]
    fn array_element_change_is_indexed() {
        let left = json!({"args": ["-a", "-b"]});
        let right = json!({"args": ["-a", "-c"]});

        check!(
            run(&left, &right)
                == Patch::new(vec![PatchOp::replace(path("/args/1"), json!("-c"))])
        );
    }

    #[test]
    fn longer_right_array_appends() {
        let left = json!([1]);
        let right = json!([1, 2, 3]);

        check!(
            run(&left, &right)
                == Patch::new(vec![
                    PatchOp::add(path("/1"), json!(2)),
                    PatchOp::add(path("/2"), json!(3)),
                ])
        );
    }

    #[test]
    fn shorter_right_array_removes_from_the_back() {
        let left = json!([1, 2, 3]);
        let right = json!([1]);

        check!(
            run(&left, &right)
                == Patch::new(vec![
                    PatchOp::remove(path("/2")),
                    PatchOp::remove(path("/1")),
                ])
        );
    }

    #[test]
    fn nested_container_field_change() {
        let left = json!({"containers": [{"name": "querier", "image": "mimir:2.9"}]});
        let right = json!({"containers": [{"name": "querier", "image": "mimir:2.10"}]});

        check!(
            run(&left, &right)
                == Patch::new(vec![PatchOp::replace(
                    path("/containers/0/image"),
                    json!("mimir:2.10")
                )])
        );
    }

    #[test]
    fn applying_the_diff_yields_the_right_side() {
        let cases = [
            (json!({"a": [1, 2, 3], "b": {"c": 1}}), json!({"a": [3], "d": null})),
            (json!([{"x": 1}, {"y": 2}]), json!([{"x": 2}, {"y": 2}, {"z": 3}])),
            (json!({"a": {"b": {"c": [true]}}}), json!({"a": {"b": {"c": []}}})),
            (json!(1), json!({"a": 1})),
        ];

        for (left, right) in cases {
            let patch = run(&left, &right);
            check!(patch.apply(&left) == Ok(right.clone()), "patch {patch}");
        }
    }
}
