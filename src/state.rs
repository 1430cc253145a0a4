//! Run state machine.
//!
//! The runner reports its progress through `RunState` and only moves between
//! states through `RunState::transition`, which rejects anything out of order.
//!
//! ```text
//! NotStarted
//!     ↓
//! Running(0) → Running(1) → ... → Running(n-1)
//!     ↓              ↓                 ↓
//! Stopped(i)   or   Completed
//! ```
//!
//! An empty plan goes straight from `NotStarted` to `Completed`.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No step has been launched yet
    #[default]
    NotStarted,
    /// The step at this plan index is executing
    Running(usize),
    /// The step at this plan index failed and does not allow continuing (terminal)
    Stopped(usize),
    /// Every step was attempted (terminal)
    Completed,
}

/// Errors that can occur during state transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Attempted to transition from a terminal state
    #[error("Cannot transition from terminal state {from}")]
    FromTerminalState { from: RunState },

    /// Attempted a transition the run order does not allow
    #[error("Cannot move from {from} to {to}")]
    OutOfOrder { from: RunState, to: RunState },
}

impl RunState {
    /// Returns true if this is a terminal state (Stopped or Completed)
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped(_) | Self::Completed)
    }

    /// Move to `to`, or explain why that is not a legal next state.
    pub fn transition(self, to: RunState) -> Result<RunState, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::FromTerminalState { from: self });
        }

        let allowed = match (self, to) {
            (Self::NotStarted, Self::Running(0)) => true,
            (Self::NotStarted, Self::Completed) => true,
            (Self::Running(i), Self::Running(j)) => j == i + 1,
            (Self::Running(i), Self::Stopped(j)) => j == i,
            (Self::Running(_), Self::Completed) => true,
            _ => false,
        };

        if allowed {
            Ok(to)
        } else {
            Err(TransitionError::OutOfOrder { from: self, to })
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Running(i) => write!(f, "running step {}", i),
            Self::Stopped(i) => write!(f, "stopped at step {}", i),
            Self::Completed => write!(f, "completed"),
        }
    }
}
