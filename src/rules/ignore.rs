use serde::Deserialize;

use crate::{
    debug::RuleDebugInfo,
    object::Object,
    patch::Patch,
    rules::{RuleDescription, steps},
};

/// Drops every object its match holds for.
///
/// ```yaml
/// ignore_rules:
///   - name: ignore memcached
///     match_kind: StatefulSet
///     match:
///       - op: test
///         path: /metadata/name
///         value: memcached
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreRule {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "match", default)]
    pub match_ops: Patch,

    /// Shorthand for a `test /kind` match step.
    #[serde(default)]
    pub match_kind: Option<String>,
}

impl IgnoreRule {
    pub fn new(name: impl Into<String>, match_ops: Patch) -> Self {
        IgnoreRule {
            name: name.into(),
            match_ops,
            match_kind: None,
        }
    }

    pub fn describe(&self) -> RuleDescription {
        RuleDescription {
            name: self.name.clone(),
            match_steps: steps(&self.canonical().match_ops),
            patch_steps: Vec::new(),
        }
    }

    pub(crate) fn map_object(
        &self,
        object: &Object,
        debug: Option<&mut RuleDebugInfo>,
    ) -> Option<Object> {
        if self.canonical().match_ops.matches(object, debug) {
            tracing::debug!(rule = %self.name, object = %object.key(), "ignoring object");
            None
        } else {
            Some(object.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn deserializes_with_match_keyword() {
        let rule: IgnoreRule = serde_yaml::from_str(
            r#"
name: ignore memcached
match_kind: StatefulSet
match:
  - op: test
    path: /metadata/name
    value: memcached
"#,
        )
        .unwrap();

        check!(rule.name == "ignore memcached");
        check!(rule.match_kind == Some("StatefulSet".to_string()));
        check!(rule.match_ops.len() == 1);
    }

    #[test]
    fn rejects_unknown_fields() {
        let_assert!(Err(_) = serde_yaml::from_str::<IgnoreRule>("name: x\nmatches: []\n"));
    }
}
