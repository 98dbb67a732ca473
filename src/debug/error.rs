use crate::{object::ResourceKey, rules::RuleStep};

/// A configured rule step that had no effect on any object.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum IneffectiveRuleError {
    #[error(
        "rule {rule:?} matching step {step}:\n\t {operation} did not match any objects in:\n{}",
        format_candidates(.candidates)
    )]
    Match {
        rule: String,
        step: usize,
        operation: RuleStep,
        candidates: Vec<ResourceKey>,
    },

    #[error(
        "rule {rule:?} patching step {step}:\n\t {operation} did not change any objects in:\n{}",
        format_candidates(.candidates)
    )]
    Patch {
        rule: String,
        step: usize,
        operation: RuleStep,
        candidates: Vec<ResourceKey>,
    },
}

impl IneffectiveRuleError {
    pub fn rule(&self) -> &str {
        match self {
            IneffectiveRuleError::Match { rule, .. } | IneffectiveRuleError::Patch { rule, .. } => {
                rule
            }
        }
    }

    pub fn candidates(&self) -> &[ResourceKey] {
        match self {
            IneffectiveRuleError::Match { candidates, .. }
            | IneffectiveRuleError::Patch { candidates, .. } => candidates,
        }
    }
}

fn format_candidates(candidates: &[ResourceKey]) -> String {
    if candidates.is_empty() {
        return "\t\t(no objects)".to_string();
    }
    candidates
        .iter()
        .map(|key| format!("\t\t{key}"))
        .collect::<Vec<_>>()
        .join("\n")
}
