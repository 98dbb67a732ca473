use std::collections::BTreeMap;

use crate::object::{Object, ResourceKey};

/// Objects of both sides partitioned by key.
#[derive(Debug, Default)]
pub struct BroadPhaseResult<'a> {
    pub pairs: Vec<(&'a Object, &'a Object)>,
    pub only_left: Vec<&'a Object>,
    pub only_right: Vec<&'a Object>,
}

/// Partitions `left` and `right` by [`ResourceKey`]. When a side holds the
/// same key more than once, the last object wins.
pub fn compare<'a>(left: &'a [Object], right: &'a [Object]) -> BroadPhaseResult<'a> {
    let left = by_key(left);
    let mut right = by_key(right);
    let mut result = BroadPhaseResult::default();

    for (key, left_object) in left {
        match right.remove(key) {
            Some(right_object) => result.pairs.push((left_object, right_object)),
            None => result.only_left.push(left_object),
        }
    }
    result.only_right.extend(right.into_values());

    result
}

fn by_key(objects: &[Object]) -> BTreeMap<&ResourceKey, &Object> {
    objects.iter().map(|object| (object.key(), object)).collect()
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;
    use crate::test_util::deployment_with_labels;

    fn names(objects: &[&Object]) -> Vec<String> {
        objects.iter().map(|o| o.key().name.clone()).collect()
    }

    #[test]
    fn partitions_by_key() {
        let left = vec![
            deployment_with_labels("querier", &[]),
            deployment_with_labels("ingester", &[]),
        ];
        let right = vec![
            deployment_with_labels("distributor", &[]),
            deployment_with_labels("querier", &[]),
        ];

        let result = compare(&left, &right);

        check!(result.pairs.len() == 1);
        check!(result.pairs[0].0.key() == result.pairs[0].1.key());
        check!(names(&result.only_left) == ["ingester"]);
        check!(names(&result.only_right) == ["distributor"]);
    }

    #[test]
    fn every_key_lands_in_exactly_one_set() {
        let left = vec![
            deployment_with_labels("a", &[]),
            deployment_with_labels("b", &[]),
            deployment_with_labels("c", &[]),
        ];
        let right = vec![
            deployment_with_labels("b", &[]),
            deployment_with_labels("c", &[]),
            deployment_with_labels("d", &[]),
            deployment_with_labels("e", &[]),
        ];

        let result = compare(&left, &right);

        let mut seen: Vec<String> = result
            .pairs
            .iter()
            .map(|(l, _)| l.key().name.clone())
            .chain(names(&result.only_left))
            .chain(names(&result.only_right))
            .collect();
        seen.sort();
        check!(seen == ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn same_name_with_different_kind_does_not_pair() {
        let deployment = deployment_with_labels("querier", &[]);
        let service = Object::new(json!({
            "apiVersion": "v1", "kind": "Service", "metadata": {"name": "querier"}
        }))
        .unwrap();

        let result = compare(std::slice::from_ref(&deployment), std::slice::from_ref(&service));

        check!(result.pairs.is_empty());
        check!(result.only_left.len() == 1);
        check!(result.only_right.len() == 1);
    }

    #[test]
    fn last_duplicate_wins() {
        let first = deployment_with_labels("querier", &[("version", "1")]);
        let second = deployment_with_labels("querier", &[("version", "2")]);
        let left = vec![first, second.clone()];

        let result = compare(&left, &[]);

        check!(result.only_left == [&second]);
    }

    #[test]
    fn empty_inputs() {
        let result = compare(&[], &[]);

        check!(result.pairs.is_empty());
        check!(result.only_left.is_empty());
        check!(result.only_right.is_empty());
    }
}
