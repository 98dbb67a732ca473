use serde::Deserialize;

use crate::{
    debug::RuleDebugInfo,
    object::Object,
    patch::Patch,
    path::Spath,
    rules::{RuleDescription, RuleError, steps},
};

/// Applies `steps` to every object its match holds for.
///
/// Besides the canonical `match`/`steps` lists a rule may use the shorthand
/// fields below, which [`PatchRule::desugar`] expands into canonical steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchRule {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "match", default)]
    pub match_ops: Patch,

    #[serde(default)]
    pub steps: Patch,

    #[serde(default)]
    pub match_kind: Option<String>,

    #[serde(default)]
    pub remove_field: Option<Spath>,

    #[serde(default)]
    pub rename_field: Option<RenameField>,

    #[serde(default)]
    pub rename_object: Option<RenameObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameField {
    pub from: Spath,
    pub to: Spath,
}

/// Renames objects called `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameObject {
    pub from: String,
    pub to: String,
}

impl PatchRule {
    pub fn new(name: impl Into<String>, match_ops: Patch, steps: Patch) -> Self {
        PatchRule {
            name: name.into(),
            match_ops,
            steps,
            ..PatchRule::default()
        }
    }

    pub fn describe(&self) -> RuleDescription {
        let rule = self.canonical();
        RuleDescription {
            name: rule.name.clone(),
            match_steps: steps(&rule.match_ops),
            patch_steps: steps(&rule.steps),
        }
    }

    pub(crate) fn map_object(
        &self,
        object: &Object,
        mut debug: Option<&mut RuleDebugInfo>,
    ) -> Result<Option<Object>, RuleError> {
        let rule = self.canonical();
        if !rule.match_ops.matches(object, debug.as_deref_mut()) {
            return Ok(Some(object.clone()));
        }

        let mut patched = object.clone();
        rule.steps
            .apply_to_object(&mut patched, debug)
            .map_err(|source| RuleError::Patch {
                key: object.key().clone(),
                source,
            })?;
        tracing::debug!(rule = %self.name, object = %object.key(), "patched object");

        Ok(Some(patched))
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;
    use crate::{
        debug::DebugInfo,
        patch::{ApplyError, PatchError, PatchOp},
        rules::ObjectRule,
        test_util::{deployment, deployment_with_labels, path},
    };

    #[test]
    fn deserializes_shorthand_fields() {
        let rule: PatchRule = serde_yaml::from_str(
            r#"
name: normalize querier
match_kind: Deployment
remove_field: /spec/replicas
rename_field:
  from: /metadata/labels/name
  to: /metadata/labels/app.kubernetes.io~1name
rename_object:
  from: querier2
  to: querier
"#,
        )
        .unwrap();

        check!(rule.match_kind == Some("Deployment".to_string()));
        check!(rule.remove_field == Some(path("/spec/replicas")));
        check!(
            rule.rename_field
                == Some(RenameField {
                    from: path("/metadata/labels/name"),
                    to: path("/metadata/labels/app.kubernetes.io~1name"),
                })
        );
        check!(rule.rename_object.as_ref().map(|r| r.to.as_str()) == Some("querier"));
        check!(rule.steps.is_empty());
    }

    #[test]
    fn invalid_path_in_rule_is_a_decode_error() {
        let_assert!(Err(err) = serde_yaml::from_str::<PatchRule>("remove_field: spec/replicas\n"));
        check!(err.to_string().contains("Invalid path syntax"));
    }

    #[test]
    fn rename_makes_objects_comparable() {
        let rule = PatchRule::new(
            "rename querier2",
            Patch::default(),
            Patch::new(vec![PatchOp::replace(path("/metadata/name"), json!("querier"))]),
        );
        let querier2 = deployment("querier2", "querier", &[("name", "querier")]);
        let querier = deployment_with_labels("querier", &[("name", "querier")]);

        let_assert!(Ok(Some(renamed)) = rule.map_object(&querier2, None));
        check!(renamed == querier);
    }

    #[test]
    fn failing_step_on_matched_object_is_an_error() {
        let rule = PatchRule::new(
            "drop name label",
            Patch::default(),
            Patch::new(vec![PatchOp::remove(path("/metadata/labels/name"))]),
        );
        let object = deployment_with_labels("querier", &[("app.kubernetes.io/name", "mimir")]);

        let_assert!(
            Err(RuleError::Patch {
                key,
                source: ApplyError::Operation {
                    source: PatchError::TargetNotFound { .. },
                    ..
                },
            }) = rule.map_object(&object, None)
        );
        check!(&key == object.key());
    }

    #[test]
    fn records_matches_and_patches() {
        let rule = PatchRule::new(
            "label querier",
            Patch::new(vec![PatchOp::test(path("/metadata/name"), json!("querier"))]),
            Patch::new(vec![PatchOp::add(path("/metadata/labels/team"), json!("mimir"))]),
        );
        let object_rule = ObjectRule::Patch(rule.clone());
        let querier = deployment_with_labels("querier", &[]);
        let mut debug_info = DebugInfo::default();
        let debug = debug_info.new_rule(&object_rule, vec![querier.key().clone()]);

        let_assert!(Ok(Some(_)) = rule.map_object(&querier, Some(debug)));
        let_assert!(Some(recorded) = debug_info.last());
        check!(recorded.matched(0).len() == 1);
        check!(recorded.patched(0).len() == 1);
        check!(!recorded.patched(0)[0].is_noop());
        let_assert!(Ok(()) = debug_info.validate_all_rules_were_effective());
    }
}
