use crate::{
    object::{ObjectError, ResourceKey},
    patch::ApplyError,
    rules::DryRunError,
};

/// A rule failed hard on one object. Failed matches never end up here.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("failed to patch {key}: {source}")]
    Patch {
        key: ResourceKey,
        #[source]
        source: ApplyError,
    },

    #[error("failed to fetch defaults for {key}: {source}")]
    DryRun {
        key: ResourceKey,
        #[source]
        source: DryRunError,
    },

    #[error("defaulted {key} is not a valid object: {source}")]
    InvalidObject {
        key: ResourceKey,
        #[source]
        source: ObjectError,
    },
}

impl RuleError {
    /// The object the rule failed on.
    pub fn key(&self) -> &ResourceKey {
        match self {
            RuleError::Patch { key, .. }
            | RuleError::DryRun { key, .. }
            | RuleError::InvalidObject { key, .. } => key,
        }
    }
}
