use crate::{
    differ::NarrowPhaseResult,
    object::{Object, ResourceKey},
};

/// A pair of objects sharing a key whose content differs.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDifference {
    pub left: Object,
    pub right: Object,
    pub patch: NarrowPhaseResult,
}

impl ObjectDifference {
    pub fn key(&self) -> &ResourceKey {
        self.left.key()
    }
}

/// Outcome of a comparison, every list sorted by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DifferenceResult {
    /// Present on both sides with equal content.
    pub matching_objects: Vec<ResourceKey>,
    /// Present on the left side only.
    pub missing_objects: Vec<ResourceKey>,
    /// Present on the right side only.
    pub extra_objects: Vec<ResourceKey>,
    pub different_objects: Vec<ObjectDifference>,
}

impl DifferenceResult {
    pub fn has_differences(&self) -> bool {
        !self.missing_objects.is_empty()
            || !self.extra_objects.is_empty()
            || !self.different_objects.is_empty()
    }

    pub(crate) fn sort(&mut self) {
        self.matching_objects.sort();
        self.missing_objects.sort();
        self.extra_objects.sort();
        self.different_objects
            .sort_by(|a, b| a.key().cmp(b.key()));
    }
}
