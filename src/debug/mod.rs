//! Bookkeeping of what every rule step matched and changed, used to reject
//! rules that silently did nothing.

mod error;

use std::fmt;

pub use error::IneffectiveRuleError;
use serde_json::Value;

use crate::{
    diff::diff,
    object::{Object, ResourceKey},
    patch::Patch,
    rules::{ObjectRule, RuleDescription},
};

/// Debug state of a whole run, one entry per applied rule.
#[derive(Debug, Default)]
pub struct DebugInfo {
    rules: Vec<RuleDebugInfo>,
}

impl DebugInfo {
    /// Starts tracking an application of `rule` over `candidates`, the keys
    /// of every object the rule is about to see.
    pub fn new_rule(&mut self, rule: &ObjectRule, candidates: Vec<ResourceKey>) -> &mut RuleDebugInfo {
        self.rules.push(RuleDebugInfo::new(rule.describe(), candidates));
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    pub fn rules(&self) -> &[RuleDebugInfo] {
        &self.rules
    }

    pub fn last(&self) -> Option<&RuleDebugInfo> {
        self.rules.last()
    }

    pub fn validate_all_rules_were_effective(&self) -> Result<(), IneffectiveRuleError> {
        self.rules
            .iter()
            .try_for_each(RuleDebugInfo::validate_all_steps_were_effective)
    }
}

/// One patch step applied to one object.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRecord {
    pub before: Value,
    pub after: Value,
    /// Structural difference between `before` and `after`.
    pub delta: Patch,
}

impl PatchRecord {
    pub fn is_noop(&self) -> bool {
        self.delta.is_empty()
    }
}

#[derive(Debug)]
pub struct RuleDebugInfo {
    description: RuleDescription,
    candidates: Vec<ResourceKey>,
    matches: Vec<Vec<Object>>,
    patches: Vec<Vec<PatchRecord>>,
}

impl RuleDebugInfo {
    fn new(description: RuleDescription, candidates: Vec<ResourceKey>) -> Self {
        RuleDebugInfo {
            matches: vec![Vec::new(); description.match_steps.len()],
            patches: vec![Vec::new(); description.patch_steps.len()],
            description,
            candidates,
        }
    }

    pub fn description(&self) -> &RuleDescription {
        &self.description
    }

    /// Objects that passed match step `step` (and every step before it).
    pub fn matched(&self, step: usize) -> &[Object] {
        self.matches.get(step).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn patched(&self, step: usize) -> &[PatchRecord] {
        self.patches.get(step).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn record_match(&mut self, step: usize, object: &Object) {
        if let Some(matched) = self.matches.get_mut(step) {
            matched.push(object.clone());
        }
    }

    pub fn record_patch(&mut self, step: usize, before: Value, after: Value) {
        if let Some(patched) = self.patches.get_mut(step) {
            let delta = diff(&before, &after);
            patched.push(PatchRecord {
                before,
                after,
                delta,
            });
        }
    }

    /// Every match step must have matched at least one object and every
    /// patch step must have changed at least one object.
    pub fn validate_all_steps_were_effective(&self) -> Result<(), IneffectiveRuleError> {
        let mut candidates = self.candidates.clone();

        for (step, matched) in self.matches.iter().enumerate() {
            if matched.is_empty() {
                return Err(IneffectiveRuleError::Match {
                    rule: self.description.name.clone(),
                    step,
                    operation: self.description.match_steps[step].clone(),
                    candidates,
                });
            }
            candidates = matched.iter().map(|object| object.key().clone()).collect();
        }

        for (step, patched) in self.patches.iter().enumerate() {
            if patched.iter().all(PatchRecord::is_noop) {
                return Err(IneffectiveRuleError::Patch {
                    rule: self.description.name.clone(),
                    step,
                    operation: self.description.patch_steps[step].clone(),
                    candidates,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for RuleDebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rule: {}", self.description.name)?;
        for (step, matched) in self.matches.iter().enumerate() {
            writeln!(f, "Match step {step}: {}", self.description.match_steps[step])?;
            writeln!(f, "  Matched:")?;
            for object in matched {
                writeln!(f, "    {}", object.key())?;
            }
        }
        for (step, patched) in self.patches.iter().enumerate() {
            writeln!(f, "Patch step {step}: {}", self.description.patch_steps[step])?;
            writeln!(f, "  Patched:")?;
            for record in patched {
                let status = if record.is_noop() { "unchanged" } else { "changed" };
                writeln!(
                    f,
                    "    {} -> {} ({status})",
                    display_key(&record.before),
                    display_key(&record.after)
                )?;
            }
        }
        Ok(())
    }
}

fn display_key(value: &Value) -> String {
    ResourceKey::from_value(value)
        .map(|key| key.to_string())
        .unwrap_or_else(|e| format!("<{e}>"))
}
