use serde::{Deserialize, Deserializer, Serialize};

/// Persisted filter selection for one inventory entity.
///
/// Filterable fields are multi-select: an item passes a field when it matches
/// any of the selected values, and an empty selection passes everything.
/// Older persisted records stored a single string per field; those
/// deserialize into a one-element selection (empty string = no selection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterState {
    /// Free-text search over name, category, and unit
    #[serde(default)]
    pub search_text: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub category: Vec<String>,
    /// Stock-level buckets ("zero", "nonzero")
    #[serde(default, deserialize_with = "one_or_many")]
    pub quantity: Vec<String>,
    /// Expiry buckets ("none", "expired", "soon", "future")
    #[serde(default, deserialize_with = "one_or_many")]
    pub expiry: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub location: Vec<String>,
    /// Whether the advanced filter panel is expanded
    #[serde(default)]
    pub show_advanced: bool,
    /// Active sort method; empty until backfilled by the filter store
    #[serde(default)]
    pub sort_method: String,
}

impl FilterState {
    /// True when any filter field would actually narrow the item list.
    /// Sort method and panel visibility don't count.
    pub fn has_active_filters(&self) -> bool {
        !self.search_text.is_empty()
            || !self.category.is_empty()
            || !self.quantity.is_empty()
            || !self.expiry.is_empty()
            || !self.location.is_empty()
    }
}

/// Accept either `"value"` or `["a", "b"]` for a filter field.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) if value.is_empty() => Vec::new(),
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}
