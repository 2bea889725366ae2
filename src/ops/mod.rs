pub mod filter_ops;
pub mod sort_ops;

pub use filter_ops::{filter_items, filter_items_on};
pub use sort_ops::{
    DEFAULT_UNCATEGORIZED_LABEL, SortMethod, compare_names, sort_items, sort_items_with_label,
};
