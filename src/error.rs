use crate::{
    debug::IneffectiveRuleError,
    differ::Side,
    load::LoadError,
    object::ResourceKey,
    rules::RuleError,
};

/// Everything that stops a comparison before it produces a result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("rule {rule:?} failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: RuleError,
    },

    #[error(transparent)]
    Ineffective(#[from] IneffectiveRuleError),

    #[error("{key} appears more than once on the {side} side")]
    DuplicateKey { side: Side, key: ResourceKey },

    #[error(transparent)]
    Load(#[from] LoadError),
}
