//! The two sides of a comparison, threaded through the rule pipeline and
//! compared.
//!
//! Comparison happens in two phases. The broad phase correlates objects by
//! [`ResourceKey`], the narrow phase diffs the content of every correlated
//! pair.

pub mod broad_phase;
pub mod narrow_phase;
mod result;

use std::{collections::BTreeSet, fmt};

pub use broad_phase::BroadPhaseResult;
pub use narrow_phase::NarrowPhaseResult;
pub use result::{DifferenceResult, ObjectDifference};

use crate::{
    debug::{DebugInfo, RuleDebugInfo},
    error::Error,
    object::{Object, ResourceKey},
    rules::ObjectRule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectDiffer {
    left: Vec<Object>,
    right: Vec<Object>,
    debug_info: DebugInfo,
}

impl ObjectDiffer {
    pub fn new() -> Self {
        ObjectDiffer::default()
    }

    pub fn load_left(&mut self, objects: Vec<Object>) -> Result<(), Error> {
        ensure_unique_keys(Side::Left, &objects)?;
        self.left = objects;
        Ok(())
    }

    pub fn load_right(&mut self, objects: Vec<Object>) -> Result<(), Error> {
        ensure_unique_keys(Side::Right, &objects)?;
        self.right = objects;
        Ok(())
    }

    pub fn left(&self) -> &[Object] {
        &self.left
    }

    pub fn right(&self) -> &[Object] {
        &self.right
    }

    pub fn debug_info(&self) -> &DebugInfo {
        &self.debug_info
    }

    /// Runs `rule` over every object of both sides, recording into a single
    /// [`RuleDebugInfo`]. Nothing changes unless every object mapped
    /// successfully.
    pub fn map_objects(&mut self, rule: &ObjectRule) -> Result<(), Error> {
        let candidates: BTreeSet<ResourceKey> = self
            .left
            .iter()
            .chain(&self.right)
            .map(|object| object.key().clone())
            .collect();
        let debug = self
            .debug_info
            .new_rule(rule, candidates.into_iter().collect());

        let left = map_side(rule, &self.left, debug)?;
        let right = map_side(rule, &self.right, debug)?;
        ensure_unique_keys(Side::Left, &left)?;
        ensure_unique_keys(Side::Right, &right)?;

        tracing::info!(
            rule = rule.name(),
            dropped = self.left.len() + self.right.len() - left.len() - right.len(),
            "applied rule"
        );
        self.left = left;
        self.right = right;
        Ok(())
    }

    /// Maps the objects through `rule`, then checks that every step of the
    /// rule had an effect on at least one object.
    pub fn apply_rule(&mut self, rule: &ObjectRule) -> Result<(), Error> {
        self.map_objects(rule)?;
        if let Some(rule_debug) = self.debug_info.last() {
            rule_debug.validate_all_steps_were_effective()?;
        }
        Ok(())
    }

    pub fn calculate_difference(&self) -> DifferenceResult {
        let broad = broad_phase::compare(&self.left, &self.right);
        let mut result = DifferenceResult {
            missing_objects: broad.only_left.iter().map(|o| o.key().clone()).collect(),
            extra_objects: broad.only_right.iter().map(|o| o.key().clone()).collect(),
            ..DifferenceResult::default()
        };

        for (left, right) in broad.pairs {
            let patch = narrow_phase::compare(left, right);
            if patch.is_empty() {
                result.matching_objects.push(left.key().clone());
            } else {
                tracing::debug!(object = %left.key(), "objects differ");
                result.different_objects.push(ObjectDifference {
                    left: left.clone(),
                    right: right.clone(),
                    patch,
                });
            }
        }

        result.sort();
        result
    }
}

fn map_side(
    rule: &ObjectRule,
    objects: &[Object],
    debug: &mut RuleDebugInfo,
) -> Result<Vec<Object>, Error> {
    let mut mapped = Vec::with_capacity(objects.len());
    for object in objects {
        let result = rule
            .map_object(object, Some(&mut *debug))
            .map_err(|source| Error::Rule {
                rule: rule.name().to_string(),
                source,
            })?;
        mapped.extend(result);
    }
    Ok(mapped)
}

fn ensure_unique_keys(side: Side, objects: &[Object]) -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for object in objects {
        if !seen.insert(object.key()) {
            return Err(Error::DuplicateKey {
                side,
                key: object.key().clone(),
            });
        }
    }
    Ok(())
}
