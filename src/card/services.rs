use crate::card::CardError;
use crate::model::{FilterState, Item};

/// Failure reported by the backend command layer. The core never retries and
/// never re-renders on a failed command; the host decides what to do with
/// the result.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The backend processed the request and said no
    #[error("command rejected: {0}")]
    Rejected(String),
    /// The backend could not be reached at all
    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

/// Outbound mutations against the inventory backend. Implemented by the
/// host's transport layer; the core only defines the seam.
pub trait CommandService {
    fn increment(&self, entity_id: &str, name: &str) -> Result<(), CommandError>;
    fn decrement(&self, entity_id: &str, name: &str) -> Result<(), CommandError>;
    fn remove(&self, entity_id: &str, name: &str) -> Result<(), CommandError>;
    fn add(&self, entity_id: &str, item: &Item) -> Result<(), CommandError>;
    fn update(&self, entity_id: &str, old_name: &str, item: &Item) -> Result<(), CommandError>;
}

/// The host's presentation layer. `render_card` receives the already
/// filtered and sorted list; the active sort method rides in
/// `filters.sort_method` (always backfilled by the filter store).
pub trait CardRenderer {
    fn render_card(
        &self,
        entity_id: &str,
        items: &[Item],
        filters: &FilterState,
    ) -> Result<(), CardError>;

    /// Show a generic error panel. `message` is always a fixed, sanitized
    /// string, never raw error text.
    fn render_error(&self, message: &str);
}
