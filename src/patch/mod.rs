mod add;
mod copy;
mod error;
mod move_op;
mod operation;
mod remove;
mod replace;

use std::{fmt, ops::Deref};

pub use add::add;
pub use copy::copy;
pub use error::{ApplyError, MatchFailure, PatchError};
pub use move_op::move_op;
pub use operation::PatchOp;
pub use remove::remove;
pub use replace::replace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
pub use test::test;

use crate::{debug::RuleDebugInfo, object::Object};

/// An ordered list of operations, evaluated strictly left to right and
/// stopping at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Vec<PatchOp>);

impl Patch {
    pub fn new(operations: Vec<PatchOp>) -> Self {
        Patch(operations)
    }

    pub fn push(&mut self, op: PatchOp) {
        self.0.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<PatchOp> {
        self.0
    }

    /// Applies every operation to a copy of `doc` and returns the result.
    pub fn apply(&self, doc: &Value) -> Result<Value, PatchError> {
        let mut doc = doc.clone();
        for op in &self.0 {
            op.apply(&mut doc)?;
        }
        Ok(doc)
    }

    /// Evaluates the operations as a predicate.
    ///
    /// Each step runs against its own copy of `doc`, so mutating operations
    /// act as existence probes. Returns the first step that did not hold.
    pub fn check(&self, doc: &Value) -> Result<(), MatchFailure> {
        self.check_steps(doc, |_| {})
    }

    /// Lenient form of [`Patch::check`]: any failing step, predicate or
    /// structural, is just "no match".
    ///
    /// When a collector is given, the object is recorded for every step it
    /// passed.
    pub fn matches(&self, object: &Object, mut debug: Option<&mut RuleDebugInfo>) -> bool {
        self.check_steps(object.as_value(), |step| {
            if let Some(debug) = debug.as_deref_mut() {
                debug.record_match(step, object);
            }
        })
        .is_ok()
    }

    fn check_steps(
        &self,
        doc: &Value,
        mut on_step_passed: impl FnMut(usize),
    ) -> Result<(), MatchFailure> {
        for (step, op) in self.0.iter().enumerate() {
            let mut scratch = doc.clone();
            op.apply(&mut scratch).map_err(|source| MatchFailure {
                step,
                op: op.clone(),
                source,
            })?;
            on_step_passed(step);
        }
        Ok(())
    }

    /// Applies the operations to `object`.
    ///
    /// Work happens on a private copy that replaces `object` only once every
    /// step succeeded and the result still has an identity. When a collector
    /// is given, each step's before/after pair is recorded.
    pub fn apply_to_object(
        &self,
        object: &mut Object,
        mut debug: Option<&mut RuleDebugInfo>,
    ) -> Result<(), ApplyError> {
        let mut working = object.as_value().clone();

        for (step, op) in self.0.iter().enumerate() {
            let before = working.clone();
            op.apply(&mut working)
                .map_err(|source| ApplyError::Operation {
                    step,
                    op: op.clone(),
                    source,
                })?;
            if let Some(debug) = debug.as_deref_mut() {
                debug.record_patch(step, before, working.clone());
            }
        }

        *object = Object::new(working).map_err(|source| ApplyError::InvalidObject { source })?;
        Ok(())
    }
}

impl Deref for Patch {
    type Target = Vec<PatchOp>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PatchOp>> for Patch {
    fn from(operations: Vec<PatchOp>) -> Self {
        Patch(operations)
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a PatchOp;
    type IntoIter = std::slice::Iter<'a, PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}
