//! Navigation phase and terminal outcomes.

use serde::{Deserialize, Serialize};

/// Why a scan session ended.
///
/// Only `DataLoss` is a failure of the system itself; the others are
/// expected outcomes of running the policy in a real room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Returned near the start pose after enough steps.
    LoopClosed,
    /// No wall came into range within the seek step ceiling.
    WallNotFound,
    /// The session step ceiling was reached.
    StepBudgetExceeded,
    /// A scan or move produced no usable samples after all retries.
    DataLoss,
    /// Stopped on request.
    Cancelled,
}

impl TerminationReason {
    /// Short code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::LoopClosed => "LOOP_CLOSED",
            Self::WallNotFound => "WALL_NOT_FOUND",
            Self::StepBudgetExceeded => "STEP_BUDGET_EXCEEDED",
            Self::DataLoss => "DATA_LOSS",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether the session ended because of lost sensor data.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::DataLoss)
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::LoopClosed => "Returned to starting position",
            Self::WallNotFound => "Could not find a wall",
            Self::StepBudgetExceeded => "Step budget exhausted",
            Self::DataLoss => "Lost sensor data",
            Self::Cancelled => "Stopped by operator",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Navigation state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavPhase {
    /// Driving straight until a wall is in range ahead.
    SeekingWall {
        /// Forward moves issued so far in this phase.
        seek_steps: u32,
    },
    /// Keeping the wall on the right while advancing.
    FollowingWall,
    /// Terminal.
    Done(TerminationReason),
}

impl NavPhase {
    /// Initial phase of every session.
    pub fn initial() -> Self {
        NavPhase::SeekingWall { seek_steps: 0 }
    }

    /// Is this the terminal phase?
    pub fn is_terminal(&self) -> bool {
        matches!(self, NavPhase::Done(_))
    }

    /// Termination reason, if terminal.
    pub fn reason(&self) -> Option<TerminationReason> {
        match self {
            NavPhase::Done(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Phase name for logging and status.
    pub fn name(&self) -> &'static str {
        match self {
            NavPhase::SeekingWall { .. } => "SEEKING_WALL",
            NavPhase::FollowingWall => "FOLLOWING_WALL",
            NavPhase::Done(_) => "DONE",
        }
    }
}

impl Default for NavPhase {
    fn default() -> Self {
        Self::initial()
    }
}
