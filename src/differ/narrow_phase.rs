use crate::{diff::diff, object::Object, patch::Patch};

/// Structural difference between two objects sharing a key, in both
/// directions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrowPhaseResult {
    /// Turns the left object into the right one.
    pub left_to_right: Patch,
    /// Turns the right object into the left one.
    pub right_to_left: Patch,
}

impl NarrowPhaseResult {
    pub fn is_empty(&self) -> bool {
        self.left_to_right.is_empty() && self.right_to_left.is_empty()
    }
}

pub fn compare(left: &Object, right: &Object) -> NarrowPhaseResult {
    NarrowPhaseResult {
        left_to_right: diff(left.as_value(), right.as_value()),
        right_to_left: diff(right.as_value(), left.as_value()),
    }
}
