use chrono::{Local, NaiveDate};

use crate::model::{FilterState, Item};

/// Days before expiry treated as "soon" when an item has no usable alert
/// window of its own.
const DEFAULT_ALERT_DAYS: i64 = 7;

/// Apply the filter state to an item list, evaluating expiry buckets against
/// today's local calendar date. Returns a new list; the input is untouched.
pub fn filter_items(items: &[Item], filters: Option<&FilterState>) -> Vec<Item> {
    filter_items_on(items, filters, Local::now().date_naive())
}

/// [`filter_items`] with an injected "today", for callers (and tests) that
/// need deterministic expiry math.
///
/// With no filter state at all the list is copied through unchanged. With a
/// state present, every field contributes one predicate and all predicates
/// must pass; a field with no selection always passes, so an all-empty state
/// also copies the list through.
pub fn filter_items_on(
    items: &[Item],
    filters: Option<&FilterState>,
    today: NaiveDate,
) -> Vec<Item> {
    let Some(filters) = filters else {
        return items.to_vec();
    };
    items
        .iter()
        .filter(|item| {
            matches_search(item, &filters.search_text)
                && matches_value(&item.category, &filters.category)
                && matches_value(&item.location, &filters.location)
                && matches_quantity(item, &filters.quantity)
                && matches_expiry(item, &filters.expiry, today)
        })
        .cloned()
        .collect()
}

/// Case-insensitive substring match over name, category, and unit.
///
/// Fields with no value are empty strings (the validation boundary
/// guarantees this), so items with a missing category or unit can never be
/// matched by accident through a placeholder label.
fn matches_search(item: &Item, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }
    let needle = search_text.to_lowercase();
    item.name.to_lowercase().contains(&needle)
        || item.category.to_lowercase().contains(&needle)
        || item.unit.to_lowercase().contains(&needle)
}

/// Multi-select equality: the item field must equal one of the selected
/// values; no selection passes everything.
fn matches_value(field: &str, selected: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|value| value == field)
}

fn matches_quantity(item: &Item, selected: &[String]) -> bool {
    selected.is_empty()
        || selected.iter().any(|value| match value.as_str() {
            "zero" => item.quantity == 0.0,
            "nonzero" => item.quantity > 0.0,
            // unrecognized bucket: no-op, not an error
            _ => true,
        })
}

fn matches_expiry(item: &Item, selected: &[String], today: NaiveDate) -> bool {
    selected.is_empty()
        || selected
            .iter()
            .any(|value| matches_expiry_value(item, value, today))
}

fn matches_expiry_value(item: &Item, value: &str, today: NaiveDate) -> bool {
    match value {
        "none" => item.expiry_date.is_empty(),
        "expired" | "soon" | "future" => {
            // Out-of-stock items never count toward any dated bucket
            if item.quantity <= 0.0 {
                return false;
            }
            let Some(days) = days_until_expiry(item, today) else {
                return false;
            };
            let threshold = alert_threshold(item);
            match value {
                "expired" => days < 0,
                "soon" => days >= 0 && days <= threshold,
                _ => days > threshold,
            }
        }
        // unrecognized bucket: no-op, not an error
        _ => true,
    }
}

/// Whole days from `today` to the item's expiry date; `None` for an empty or
/// unparseable date (an unparseable date matches no bucket, including
/// "none").
fn days_until_expiry(item: &Item, today: NaiveDate) -> Option<i64> {
    let date = parse_expiry(&item.expiry_date)?;
    Some((date - today).num_days())
}

pub(crate) fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// A zero or negative per-item alert window means "unset".
fn alert_threshold(item: &Item) -> i64 {
    if item.expiry_alert_days > 0 {
        item.expiry_alert_days
    } else {
        DEFAULT_ALERT_DAYS
    }
}
