use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use chrono::NaiveDate;

use crate::model::Item;
use crate::ops::filter_ops::parse_expiry;

/// Group label for items with no category when sorting by category.
/// Hosts with a localization table inject their own via
/// [`sort_items_with_label`].
pub const DEFAULT_UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A recognized sort method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    Name,
    Category,
    Quantity,
    QuantityLow,
    Expiry,
    ZeroLast,
}

impl SortMethod {
    /// Parse a stored method string. Unknown strings are `None`, which sorts
    /// as a no-op rather than an error.
    pub fn parse(method: &str) -> Option<SortMethod> {
        match method {
            "name" => Some(SortMethod::Name),
            "category" => Some(SortMethod::Category),
            "quantity" => Some(SortMethod::Quantity),
            "quantity-low" => Some(SortMethod::QuantityLow),
            "expiry" => Some(SortMethod::Expiry),
            "zero-last" => Some(SortMethod::ZeroLast),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMethod::Name => "name",
            SortMethod::Category => "category",
            SortMethod::Quantity => "quantity",
            SortMethod::QuantityLow => "quantity-low",
            SortMethod::Expiry => "expiry",
            SortMethod::ZeroLast => "zero-last",
        }
    }
}

/// Sort a copy of the item list by the given method. Unknown methods return
/// the copy in its original order.
pub fn sort_items(items: &[Item], method: &str) -> Vec<Item> {
    sort_items_with_label(items, method, DEFAULT_UNCATEGORIZED_LABEL)
}

/// [`sort_items`] with an injected uncategorized group label.
///
/// Every method breaks primary-key ties with the natural name comparison,
/// so equal-keyed items always appear in a stable, predictable order.
pub fn sort_items_with_label(items: &[Item], method: &str, uncategorized: &str) -> Vec<Item> {
    let mut sorted = items.to_vec();
    let Some(method) = SortMethod::parse(method) else {
        return sorted;
    };
    match method {
        SortMethod::Name => {
            sorted.sort_by(|a, b| compare_names(&a.name, &b.name));
        }
        SortMethod::Category => {
            sorted.sort_by(|a, b| {
                compare_names(category_key(a, uncategorized), category_key(b, uncategorized))
                    .then_with(|| compare_names(&a.name, &b.name))
            });
        }
        SortMethod::Quantity => {
            sorted.sort_by(|a, b| {
                quantity_cmp(b.quantity, a.quantity)
                    .then_with(|| compare_names(&a.name, &b.name))
            });
        }
        SortMethod::QuantityLow => {
            sorted.sort_by(|a, b| {
                quantity_cmp(a.quantity, b.quantity)
                    .then_with(|| compare_names(&a.name, &b.name))
            });
        }
        SortMethod::Expiry => {
            sorted.sort_by(|a, b| {
                expiry_key(a)
                    .cmp(&expiry_key(b))
                    .then_with(|| compare_names(&a.name, &b.name))
            });
        }
        SortMethod::ZeroLast => {
            sorted.sort_by(|a, b| {
                let a_out = a.quantity <= 0.0;
                let b_out = b.quantity <= 0.0;
                a_out
                    .cmp(&b_out)
                    .then_with(|| compare_names(&a.name, &b.name))
            });
        }
    }
    sorted
}

fn category_key<'a>(item: &'a Item, uncategorized: &'a str) -> &'a str {
    if item.category.is_empty() {
        uncategorized
    } else {
        &item.category
    }
}

fn quantity_cmp(a: f64, b: f64) -> Ordering {
    // Quantities are finite past the validation boundary
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Items with no (or unreadable) expiry date sort after every dated item.
fn expiry_key(item: &Item) -> NaiveDate {
    parse_expiry(&item.expiry_date).unwrap_or(NaiveDate::MAX)
}

/// Natural name ordering: leading/trailing whitespace ignored,
/// case-insensitive, digit runs compared as numbers so `Item 2` sorts before
/// `Item 10`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.trim().chars().peekable();
    let mut b_chars = b.trim().chars().peekable();
    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digit_run(&mut a_chars);
                let run_b = take_digit_run(&mut b_chars);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compare two digit runs numerically without parsing (runs can exceed any
/// integer type). Leading zeros don't affect the value.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
