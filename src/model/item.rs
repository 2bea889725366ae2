use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single inventory item as displayed by the card.
///
/// Instances only enter the core through [`validate_inventory_items`], so
/// every field is guaranteed to hold its documented primitive type. Upstream
/// state pushes arrive as loose JSON and are never trusted past that
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Display name; non-empty, unique within one inventory (enforced upstream)
    pub name: String,
    /// Current stock count (may be fractional, e.g. 1.5 kg)
    #[serde(default)]
    pub quantity: f64,
    /// Unit label shown next to the quantity
    #[serde(default)]
    pub unit: String,
    /// Category label; empty = uncategorized
    #[serde(default)]
    pub category: String,
    /// Storage location label
    #[serde(default)]
    pub location: String,
    /// ISO date (`YYYY-MM-DD`) or empty for no expiry
    #[serde(default)]
    pub expiry_date: String,
    /// Days before expiry at which the item counts as expiring "soon";
    /// zero or negative means "use the default window"
    #[serde(default)]
    pub expiry_alert_days: i64,
    /// Name of the todo list this item restocks onto
    #[serde(default)]
    pub todo_list: String,
    /// Whether the item is auto-added to its todo list when stock runs low
    #[serde(default)]
    pub auto_add_enabled: bool,
    /// Stock level at or below which auto-add triggers
    #[serde(default)]
    pub auto_add_to_list_quantity: f64,
}

impl Item {
    /// Create an item with the given name and quantity, all other fields empty.
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Item {
            name: name.into(),
            quantity,
            unit: String::new(),
            category: String::new(),
            location: String::new(),
            expiry_date: String::new(),
            expiry_alert_days: 0,
            todo_list: String::new(),
            auto_add_enabled: false,
            auto_add_to_list_quantity: 0.0,
        }
    }
}

/// Normalize a raw upstream item list into closed [`Item`] records.
///
/// Per-field coercion: wrong-typed or non-finite numbers become `0.0`,
/// wrong-typed strings become `""`, wrong-typed booleans become `false`.
/// Entries that are not objects, or whose `name` is missing, not a string,
/// or empty, are dropped.
pub fn validate_inventory_items(raw: &[Value]) -> Vec<Item> {
    raw.iter().filter_map(validate_item).collect()
}

fn validate_item(value: &Value) -> Option<Item> {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            log::debug!("dropping non-object inventory entry");
            return None;
        }
    };
    let name = match obj.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            log::debug!("dropping inventory entry with no usable name");
            return None;
        }
    };
    Some(Item {
        name,
        quantity: num_field(obj, "quantity"),
        unit: str_field(obj, "unit"),
        category: str_field(obj, "category"),
        location: str_field(obj, "location"),
        expiry_date: str_field(obj, "expiry_date"),
        expiry_alert_days: int_field(obj, "expiry_alert_days"),
        todo_list: str_field(obj, "todo_list"),
        auto_add_enabled: bool_field(obj, "auto_add_enabled"),
        auto_add_to_list_quantity: num_field(obj, "auto_add_to_list_quantity"),
    })
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn num_field(obj: &serde_json::Map<String, Value>, key: &str) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn int_field(obj: &serde_json::Map<String, Value>, key: &str) -> i64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n as i64)
        .unwrap_or(0)
}

fn bool_field(obj: &serde_json::Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}
