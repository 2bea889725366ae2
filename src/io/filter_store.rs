use crate::io::kv::{KeyValueStore, StoreError};
use crate::model::FilterState;

/// Namespace prefix so the card's records can't collide with other users of
/// the same durable store.
const KEY_PREFIX: &str = "larder_filters_";

/// Persists one [`FilterState`] per inventory entity in a durable
/// string-keyed store. Owns default backfilling: callers always get a
/// well-formed state back, whatever is (or isn't) on disk.
pub struct FilterStore {
    store: Box<dyn KeyValueStore>,
    default_sort: String,
}

impl FilterStore {
    pub fn new(store: Box<dyn KeyValueStore>, default_sort: impl Into<String>) -> Self {
        FilterStore {
            store,
            default_sort: default_sort.into(),
        }
    }

    fn key(&self, entity_id: &str) -> String {
        format!("{KEY_PREFIX}{entity_id}")
    }

    /// Read the stored filters for an entity.
    ///
    /// Absent, empty, or unparseable records resolve to the default state
    /// (parse failures are logged, never raised). A parsed record with no
    /// sort method gets the configured default backfilled, so legacy records
    /// keep sorting.
    pub fn get(&self, entity_id: &str) -> FilterState {
        let Some(raw) = self.store.get(&self.key(entity_id)) else {
            return self.default_state();
        };
        if raw.trim().is_empty() {
            return self.default_state();
        }
        match serde_json::from_str::<FilterState>(&raw) {
            Ok(mut state) => {
                if state.sort_method.is_empty() {
                    state.sort_method = self.default_sort.clone();
                }
                state
            }
            Err(e) => {
                log::warn!("discarding unreadable filter state for {entity_id}: {e}");
                self.default_state()
            }
        }
    }

    /// Serialize and write, overwriting any previous record without merging.
    pub fn save(&mut self, entity_id: &str, filters: &FilterState) -> Result<(), StoreError> {
        let json = serde_json::to_string(filters)?;
        self.store.set(&self.key(entity_id), &json)
    }

    /// Remove the stored record entirely. Distinct from saving defaults:
    /// after a clear, the store holds nothing for this entity.
    pub fn clear(&mut self, entity_id: &str) -> Result<(), StoreError> {
        self.store.remove(&self.key(entity_id))
    }

    /// True if a record exists for this entity (cleared vs. never-filtered).
    pub fn contains(&self, entity_id: &str) -> bool {
        self.store.get(&self.key(entity_id)).is_some()
    }

    fn default_state(&self) -> FilterState {
        FilterState {
            sort_method: self.default_sort.clone(),
            ..Default::default()
        }
    }
}
