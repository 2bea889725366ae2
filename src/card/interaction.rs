use std::cell::Cell;
use std::time::{Duration, Instant};

/// Tracks whether the user currently has focus inside an editable control.
///
/// The host's event wiring calls [`focus_gained`]/[`focus_lost`] from its
/// focus and blur handlers; the coordinator polls [`is_interacting`]. A blur
/// keeps the flag raised for a short settle window so focus hopping between
/// sibling controls doesn't flicker it.
///
/// [`focus_gained`]: InteractionTracker::focus_gained
/// [`focus_lost`]: InteractionTracker::focus_lost
/// [`is_interacting`]: InteractionTracker::is_interacting
#[derive(Debug)]
pub struct InteractionTracker {
    settle: Duration,
    state: Cell<FocusState>,
}

#[derive(Debug, Clone, Copy)]
enum FocusState {
    Idle,
    Held,
    Settling(Instant),
}

impl InteractionTracker {
    pub fn new(settle: Duration) -> Self {
        InteractionTracker {
            settle,
            state: Cell::new(FocusState::Idle),
        }
    }

    /// An editable control gained focus: interacting, immediately.
    pub fn focus_gained(&self) {
        self.state.set(FocusState::Held);
    }

    /// Focus left an editable control: keep interacting until the settle
    /// window passes. A focus regained within the window cancels it.
    pub fn focus_lost(&self) {
        self.state.set(FocusState::Settling(Instant::now() + self.settle));
    }

    /// Poll the flag. Reads during a lapsed settle window collapse the state
    /// back to idle.
    pub fn is_interacting(&self) -> bool {
        match self.state.get() {
            FocusState::Idle => false,
            FocusState::Held => true,
            FocusState::Settling(until) => {
                if Instant::now() < until {
                    true
                } else {
                    self.state.set(FocusState::Idle);
                    false
                }
            }
        }
    }

    /// Drop any held or settling focus state.
    pub fn reset(&self) {
        self.state.set(FocusState::Idle);
    }
}
