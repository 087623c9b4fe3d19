//! Run states of the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a run currently is.
///
/// `Validating → Stage(1) → … → Stage(n) → Cleanup → Done`, with `Aborted`
/// reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Checking arguments, installation, temp namespace and executables.
    Validating,
    /// Running the stage with this 1-based position.
    Stage(usize),
    /// Removing temporary files.
    Cleanup,
    /// Every step succeeded.
    Done,
    /// A check or a stage failed.
    Aborted,
}

impl Default for RunState {
    fn default() -> Self {
        Self::Validating
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::Stage(n) => write!(f, "stage {n}"),
            Self::Cleanup => write!(f, "cleanup"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

impl RunState {
    /// Returns true if the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if the run finished successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving to `next` is a legal transition.
    #[must_use]
    pub fn can_advance_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::Done | Self::Aborted, _) => false,
            (_, Self::Aborted) => true,
            (Self::Validating, Self::Stage(1)) => true,
            (Self::Stage(n), Self::Stage(m)) => m == n + 1,
            (Self::Stage(_), Self::Cleanup | Self::Done) | (Self::Cleanup, Self::Done) => true,
            _ => false,
        }
    }
}
