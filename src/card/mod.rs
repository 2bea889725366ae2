pub mod changes;
pub mod coordinator;
pub mod interaction;
pub mod lifecycle;
pub mod services;

pub use changes::ChangeDetector;
pub use coordinator::RenderCoordinator;
pub use interaction::InteractionTracker;
pub use lifecycle::{CardDeps, CardServices, Lifecycle};
pub use services::{CardRenderer, CommandError, CommandService};

use crate::io::StoreError;

/// Error type for the render pipeline. Contained at the coordinator
/// boundary; hosts only ever see it through their own trait impls.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// The host's renderer failed to draw
    #[error("render failed: {0}")]
    Render(String),
    /// The durable store failed underneath a filter operation
    #[error(transparent)]
    Store(#[from] StoreError),
}
