//! Named animation targets

use crate::props::Target;
use indexmap::IndexMap;

/// Targets keyed by label ("hidden", "visible", ...)
///
/// When an element animates to a label, children without their own
/// `animate` follow with the same label, so one label can orchestrate a
/// whole subtree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Variants {
    targets: IndexMap<String, Target>,
}

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, target: Target) -> Self {
        self.targets.insert(label.into(), target);
        self
    }

    pub fn get(&self, label: &str) -> Option<&Target> {
        self.targets.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.targets.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
