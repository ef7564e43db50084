//! Operation lifecycle states.

use super::result::{Outcome, WorkerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the `OkCancel` lifecycle.
///
/// `Idle → Processing → {Succeeded, Cancelled, Errored}`; the last three are
/// terminal. A pre-emptive cancel may also move `Idle` straight to `Cancelled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    #[default]
    Idle,
    Processing,
    Succeeded,
    Cancelled,
    Errored,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Cancelled | Self::Errored)
    }

    /// Terminal state a result resolves to.
    pub fn for_result(result: &WorkerResult) -> Self {
        match result.outcome() {
            Outcome::Succeeded => Self::Succeeded,
            Outcome::Cancelled => Self::Cancelled,
            Outcome::Errored { .. } => Self::Errored,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Processing => "Processing",
            Self::Succeeded => "Succeeded",
            Self::Cancelled => "Cancelled",
            Self::Errored => "Errored",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
