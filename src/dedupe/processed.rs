use std::collections::HashSet;

use crate::domain::bookmark::WorkItem;

/// Items bookmarked during this run. Only grows; lives as long as the process.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    items: HashSet<WorkItem>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item: &WorkItem) -> bool {
        self.items.contains(item)
    }

    /// Returns `false` if the item was already recorded.
    pub fn record(&mut self, item: WorkItem) -> bool {
        self.items.insert(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
