use serde::Deserialize;

use crate::rules::{DefaultingRule, IgnoreRule, ObjectRule, PatchRule};

/// Rules as written in a rule file.
///
/// ```yaml
/// ignore_rules:
///   - name: ...
/// patches:
///   - name: ...
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default)]
    pub ignore_rules: Vec<IgnoreRule>,

    #[serde(default)]
    pub patches: Vec<PatchRule>,
}

impl RuleSet {
    /// Appends the rules of `other` after the rules of `self`.
    pub fn merge(&mut self, other: RuleSet) {
        self.ignore_rules.extend(other.ignore_rules);
        self.patches.extend(other.patches);
    }

    pub fn desugar(self) -> Self {
        RuleSet {
            ignore_rules: self.ignore_rules.into_iter().map(IgnoreRule::desugar).collect(),
            patches: self.patches.into_iter().map(PatchRule::desugar).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ignore_rules.is_empty() && self.patches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ignore_rules.len() + self.patches.len()
    }

    /// Orders the rules for application: ignore rules, then defaulting when
    /// given, then patches.
    pub fn into_pipeline(self, defaulting: Option<DefaultingRule>) -> Vec<ObjectRule> {
        let ignore = self.ignore_rules.into_iter().map(ObjectRule::from);
        let defaulting = defaulting.into_iter().map(ObjectRule::from);
        let patches = self.patches.into_iter().map(ObjectRule::from);

        ignore.chain(defaulting).chain(patches).collect()
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        patch::PatchOp,
        rules::{DryRunClient, DryRunError},
        test_util::path,
    };

    struct Echo;

    impl DryRunClient for Echo {
        fn create(&self, object: &Value) -> Result<Value, DryRunError> {
            Ok(object.clone())
        }
    }

    fn rules(yaml: &str) -> RuleSet {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn merge_concatenates_in_order() {
        let mut merged = rules("ignore_rules:\n  - name: a\npatches:\n  - name: p1\n");
        merged.merge(rules("ignore_rules:\n  - name: b\n"));
        merged.merge(rules("patches:\n  - name: p2\n"));

        let ignore: Vec<_> = merged.ignore_rules.iter().map(|r| r.name.as_str()).collect();
        let patches: Vec<_> = merged.patches.iter().map(|r| r.name.as_str()).collect();
        check!(ignore == ["a", "b"]);
        check!(patches == ["p1", "p2"]);
        check!(merged.len() == 4);
    }

    #[test]
    fn empty_document_is_an_empty_rule_set() {
        let set: RuleSet = serde_yaml::from_str("{}").unwrap();
        check!(set.is_empty());
    }

    #[test]
    fn desugar_twice_is_unchanged() {
        let set = rules(
            r#"
ignore_rules:
  - name: ignore memcached
    match_kind: StatefulSet
patches:
  - name: drop replicas
    remove_field: /spec/replicas
"#,
        );

        let once = set.desugar();
        let twice = once.clone().desugar();
        check!(once == twice);
        check!(once.patches[0].is_desugared());
        check!(once.ignore_rules[0].match_ops[0] == PatchOp::test(path("/kind"), json!("StatefulSet")));
    }

    #[test]
    fn pipeline_puts_defaulting_between_ignores_and_patches() {
        let set = rules("patches:\n  - name: p\nignore_rules:\n  - name: i\n");

        let pipeline = set.into_pipeline(Some(DefaultingRule::new(Box::new(Echo))));

        let names: Vec<_> = pipeline.iter().map(ObjectRule::name).collect();
        check!(names == ["i", DefaultingRule::NAME, "p"]);
        let_assert!(ObjectRule::Defaulting(_) = &pipeline[1]);
    }

    #[test]
    fn pipeline_without_defaulting() {
        let set = rules("patches:\n  - name: p\nignore_rules:\n  - name: i\n");

        let names: Vec<_> = set.into_pipeline(None).iter().map(|r| r.name().to_string()).collect();
        check!(names == ["i", "p"]);
    }
}
