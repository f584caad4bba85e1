//! Stage status enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The execution status of a stage.
///
/// `Pending` is the initial state. `Running` is entered when the
/// coordinator invokes the stage, and the stage settles into `Completed`
/// or `Error`. A stage reused for a later run re-enters `Running` from
/// whichever terminal state it held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not started executing.
    Pending,
    /// Stage is currently executing.
    Running,
    /// Stage finished successfully.
    Completed,
    /// Stage failed.
    Error,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status is terminal for one invocation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Returns true if the status indicates success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the status indicates failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Error)
    }
}
