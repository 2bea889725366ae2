//! Core logic for an inventory card widget.
//!
//! The crate owns the decisions a card has to get right: turning a persisted
//! filter specification plus raw item records into an ordered, displayable
//! subset ([`ops`]), deciding on every upstream state push whether a
//! re-render is warranted and when it should happen ([`card`]), and keeping
//! per-entity filter state in a durable store with safe defaults ([`io`]).
//! Presentation, command transport, and event wiring stay in the host behind
//! the [`card::CardRenderer`] and [`card::CommandService`] seams.

pub mod card;
pub mod io;
pub mod model;
pub mod ops;

pub use card::{
    CardDeps, CardError, CardRenderer, CardServices, ChangeDetector, CommandError, CommandService,
    InteractionTracker, Lifecycle, RenderCoordinator,
};
pub use io::{FileStore, FilterStore, KeyValueStore, MemoryStore, StoreError};
pub use model::{CardConfig, FilterState, Item, validate_inventory_items};
pub use ops::{
    SortMethod, compare_names, filter_items, filter_items_on, sort_items, sort_items_with_label,
};
