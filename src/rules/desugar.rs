//! Expansion of the shorthand rule fields into canonical match and patch
//! steps. Expanded fields are cleared, so desugaring twice is a no-op.

use std::borrow::Cow;

use serde_json::Value;

use crate::{
    patch::{Patch, PatchOp},
    path::Spath,
    rules::{IgnoreRule, PatchRule, RenameField, RenameObject},
};

fn kind_path() -> Spath {
    Spath::from_fields(["kind"])
}

fn name_path() -> Spath {
    Spath::from_fields(["metadata", "name"])
}

/// `match_kind` goes in front of the explicit match steps.
fn prepend_kind(match_kind: Option<String>, match_ops: Patch) -> Vec<PatchOp> {
    match_kind
        .map(|kind| PatchOp::test(kind_path(), Value::String(kind)))
        .into_iter()
        .chain(match_ops.into_inner())
        .collect()
}

impl IgnoreRule {
    pub fn desugar(mut self) -> Self {
        let match_ops = prepend_kind(self.match_kind.take(), std::mem::take(&mut self.match_ops));
        self.match_ops = match_ops.into();
        self
    }

    pub fn is_desugared(&self) -> bool {
        self.match_kind.is_none()
    }

    /// The rule with its shorthand expanded, borrowed when there is none.
    pub(crate) fn canonical(&self) -> Cow<'_, IgnoreRule> {
        if self.is_desugared() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.clone().desugar())
        }
    }
}

impl PatchRule {
    pub fn desugar(mut self) -> Self {
        let mut match_ops =
            prepend_kind(self.match_kind.take(), std::mem::take(&mut self.match_ops));
        let mut steps = std::mem::take(&mut self.steps).into_inner();

        // Removing on a scratch copy is an existence probe for the field.
        if let Some(field) = self.remove_field.take() {
            match_ops.push(PatchOp::remove(field.clone()));
            steps.push(PatchOp::remove(field));
        }
        if let Some(RenameField { from, to }) = self.rename_field.take() {
            match_ops.push(PatchOp::remove(from.clone()));
            steps.push(PatchOp::move_op(from, to));
        }
        if let Some(RenameObject { from, to }) = self.rename_object.take() {
            match_ops.push(PatchOp::test(name_path(), Value::String(from)));
            steps.push(PatchOp::replace(name_path(), Value::String(to)));
        }

        self.match_ops = match_ops.into();
        self.steps = steps.into();
        self
    }

    pub fn is_desugared(&self) -> bool {
        self.match_kind.is_none()
            && self.remove_field.is_none()
            && self.rename_field.is_none()
            && self.rename_object.is_none()
    }

    /// The rule with its shorthand expanded, borrowed when there is none.
    pub(crate) fn canonical(&self) -> Cow<'_, PatchRule> {
        if self.is_desugared() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.clone().desugar())
        }
    }
}
