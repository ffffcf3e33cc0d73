use crate::domain::ports::StatusDisplay;
use crate::domain::state::PaymentState;
use crate::domain::status::PaymentStatus;

/// UI side effect produced by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Still waiting; refresh the status line.
    Status(StatusDisplay),
    /// Entered `Approved`. Emitted at most once per machine.
    Success,
    /// Entered a failure terminal state.
    Failure(StatusDisplay),
}

/// Interprets successive status polls for a single session.
///
/// Once a terminal state is reached every further input is ignored, so
/// duplicated or out-of-order responses cannot produce a second effect.
#[derive(Debug, Clone)]
pub struct PaymentStateMachine {
    state: PaymentState,
}

impl Default for PaymentStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentStateMachine {
    pub fn new() -> Self {
        Self {
            state: PaymentState::Pending,
        }
    }

    pub fn state(&self) -> PaymentState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Feeds one poll result. Returns `None` when the machine is already
    /// terminal and the input was dropped.
    pub fn apply(&mut self, status: &PaymentStatus) -> Option<Effect> {
        if self.is_terminal() {
            return None;
        }
        self.enter(PaymentState::from(status), Some(status))
    }

    /// Forces `TimedOut` when the polling ceiling elapses.
    pub fn time_out(&mut self) -> Option<Effect> {
        if self.is_terminal() {
            return None;
        }
        self.enter(PaymentState::TimedOut, None)
    }

    fn enter(&mut self, next: PaymentState, status: Option<&PaymentStatus>) -> Option<Effect> {
        self.state = next;
        let display = StatusDisplay::for_update(next, status);
        let effect = if next == PaymentState::Approved {
            Effect::Success
        } else if next.is_failure() {
            Effect::Failure(display)
        } else {
            Effect::Status(display)
        };
        Some(effect)
    }
}
