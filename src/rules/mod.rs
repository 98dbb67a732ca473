//! Rules that normalize objects before they are compared.
//!
//! Every rule maps one object to zero or one object. Rules are applied in a
//! caller-chosen order to both sides of the comparison, see
//! [`crate::differ::ObjectDiffer::apply_rule`].

mod defaulting;
mod desugar;
mod error;
mod ignore;
mod patch_rule;
mod ruleset;

use std::fmt;

pub use defaulting::{DefaultingRule, DryRunClient, DryRunError, KubectlDryRun};
pub use error::RuleError;
pub use ignore::IgnoreRule;
pub use patch_rule::{PatchRule, RenameField, RenameObject};
pub use ruleset::RuleSet;

use crate::{debug::RuleDebugInfo, object::Object, patch::PatchOp};

#[derive(Debug)]
pub enum ObjectRule {
    Ignore(IgnoreRule),
    Patch(PatchRule),
    Defaulting(DefaultingRule),
}

impl ObjectRule {
    pub fn name(&self) -> &str {
        match self {
            ObjectRule::Ignore(rule) => &rule.name,
            ObjectRule::Patch(rule) => &rule.name,
            ObjectRule::Defaulting(_) => DefaultingRule::NAME,
        }
    }

    pub fn describe(&self) -> RuleDescription {
        match self {
            ObjectRule::Ignore(rule) => rule.describe(),
            ObjectRule::Patch(rule) => rule.describe(),
            ObjectRule::Defaulting(rule) => rule.describe(),
        }
    }

    /// Maps `object` through the rule. `Ok(None)` drops the object.
    pub fn map_object(
        &self,
        object: &Object,
        debug: Option<&mut RuleDebugInfo>,
    ) -> Result<Option<Object>, RuleError> {
        match self {
            ObjectRule::Ignore(rule) => Ok(rule.map_object(object, debug)),
            ObjectRule::Patch(rule) => rule.map_object(object, debug),
            ObjectRule::Defaulting(rule) => rule.map_object(object, debug),
        }
    }
}

impl From<IgnoreRule> for ObjectRule {
    fn from(rule: IgnoreRule) -> Self {
        ObjectRule::Ignore(rule.desugar())
    }
}

impl From<PatchRule> for ObjectRule {
    fn from(rule: PatchRule) -> Self {
        ObjectRule::Patch(rule.desugar())
    }
}

impl From<DefaultingRule> for ObjectRule {
    fn from(rule: DefaultingRule) -> Self {
        ObjectRule::Defaulting(rule)
    }
}

/// Name and canonical steps of a rule, as seen by the debug bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDescription {
    pub name: String,
    pub match_steps: Vec<RuleStep>,
    pub patch_steps: Vec<RuleStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleStep {
    Operation(PatchOp),
    /// Server side defaulting, performed by a [`DefaultingRule`].
    SetDefaults,
}

impl From<PatchOp> for RuleStep {
    fn from(op: PatchOp) -> Self {
        RuleStep::Operation(op)
    }
}

impl fmt::Display for RuleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStep::Operation(op) => op.fmt(f),
            RuleStep::SetDefaults => f.write_str("set_defaults"),
        }
    }
}

fn steps<'a>(ops: impl IntoIterator<Item = &'a PatchOp>) -> Vec<RuleStep> {
    ops.into_iter().cloned().map(RuleStep::Operation).collect()
}
