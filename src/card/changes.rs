use indexmap::IndexMap;

use crate::model::Item;

/// Tracks the last known item list per entity and reports whether an
/// incoming push actually changed anything.
///
/// Snapshots are replaced wholesale with independent copies, never mutated
/// in place, and a push with no item list at all never advances the stored
/// baseline — a "no items" transient must not erase the last known-good
/// comparison state.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    snapshots: IndexMap<String, Vec<Item>>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        ChangeDetector::default()
    }

    /// Compare `new_items` against the stored snapshot for `entity_id`.
    ///
    /// First observation of an entity records the snapshot (when items are
    /// present) and reports a change. After that: structurally equal lists
    /// report no change; an unequal present list replaces the snapshot and
    /// reports a change; an absent list reports a change without touching
    /// the snapshot.
    pub fn has_real_change(&mut self, entity_id: &str, new_items: Option<&[Item]>) -> bool {
        match self.snapshots.get(entity_id) {
            None => {
                if let Some(items) = new_items {
                    self.snapshots.insert(entity_id.to_string(), items.to_vec());
                }
                true
            }
            Some(previous) => match new_items {
                Some(items) if previous.as_slice() == items => false,
                Some(items) => {
                    self.snapshots.insert(entity_id.to_string(), items.to_vec());
                    true
                }
                None => true,
            },
        }
    }

    /// Read-only peek at the stored baseline for an entity.
    pub fn snapshot(&self, entity_id: &str) -> Option<&[Item]> {
        self.snapshots.get(entity_id).map(Vec::as_slice)
    }

    /// Drop the baseline for one entity, so its next push reads as a change.
    pub fn forget(&mut self, entity_id: &str) {
        self.snapshots.shift_remove(entity_id);
    }
}
