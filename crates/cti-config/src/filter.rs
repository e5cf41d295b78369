//! Events excluded from upload.

use serde::Serialize;
use std::collections::HashSet;

/// Set of event names that must not be uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSet(HashSet<String>);

impl FilterSet {
    /// Collapse repeated `--filterEvent` values into a set.
    pub fn from_flags(flags: &[String]) -> Self {
        Self(flags.iter().cloned().collect())
    }

    pub fn contains(&self, event_name: &str) -> bool {
        self.0.contains(event_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Members in lexicographic order, for stable output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.iter().collect();
        names.sort_unstable();
        names
    }
}

/// Build the filter set from the ordered `--filterEvent` values.
pub fn build_filter_set(flags: &[String]) -> FilterSet {
    FilterSet::from_flags(flags)
}
