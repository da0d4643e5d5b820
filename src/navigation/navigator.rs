//! Wall-seeking and right-hand wall-following decision logic.
//!
//! The [`Navigator`] is stateless apart from its configuration: the caller
//! owns the current [`NavPhase`] and feeds it back in on every call.
//!
//! # Phases
//!
//! ```text
//! SEEKING_WALL ──(forward ≤ max_wall)──> FOLLOWING_WALL ──(loop closed / budget)──> DONE
//!      │  (mandatory left turn on entry)          │
//!      └──(seek ceiling / data loss)──> DONE <────┘ (data loss)
//! ```

use serde::{Deserialize, Serialize};

use super::state::{NavPhase, TerminationReason};
use crate::core::math::heading_difference;
use crate::core::types::{DirectionDistances, MoveAction, Pose};

/// Configuration for the navigation state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Minimum safe clearance ahead (cm). Must exceed one step.
    pub min_distance_cm: f64,
    /// Closest acceptable distance to the right-hand wall (cm).
    pub target_wall_distance_cm: f64,
    /// Farthest distance at which a wall still counts as present (cm).
    pub max_wall_distance_cm: f64,
    /// Distance covered by one forward move (m).
    pub step_distance_m: f32,
    /// Session step ceiling.
    pub max_steps: u32,
    /// Forward moves allowed while seeking a wall.
    pub max_seek_steps: u32,
    /// Steps that must elapse before loop closure is considered.
    pub loop_closure_min_steps: u32,
    /// Maximum heading difference from the start heading for loop closure (deg).
    pub loop_closure_heading_tolerance_deg: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            min_distance_cm: 60.0,
            target_wall_distance_cm: 25.0,
            max_wall_distance_cm: 50.0,
            step_distance_m: 0.5,
            max_steps: 100,
            max_seek_steps: 10,
            loop_closure_min_steps: 10,
            loop_closure_heading_tolerance_deg: 45.0,
        }
    }
}

/// Which wall-following rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowRule {
    /// Forward clearance below the safe minimum.
    ObstacleAhead,
    /// Right-hand wall farther than the maximum.
    WallLost,
    /// Right-hand wall closer than the target.
    TooClose,
    /// Within band; keep going.
    Hold,
}

/// Command emitted by one navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Issue this move next.
    Move(MoveAction),
    /// Stop the session.
    Finish(TerminationReason),
}

/// Outcome of one navigation step: the next phase and what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavDecision {
    pub phase: NavPhase,
    pub command: NavCommand,
}

impl NavDecision {
    fn finish(reason: TerminationReason) -> Self {
        Self {
            phase: NavPhase::Done(reason),
            command: NavCommand::Finish(reason),
        }
    }

    fn moving(phase: NavPhase, action: MoveAction) -> Self {
        Self {
            phase,
            command: NavCommand::Move(action),
        }
    }
}

/// Two-phase wall-following navigator.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    config: NavigatorConfig,
}

impl Navigator {
    /// Create a navigator with the given configuration.
    pub fn new(config: NavigatorConfig) -> Self {
        Self { config }
    }

    /// Get configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Decide the next step from the current phase and the latest scan.
    ///
    /// `distances` is `None` when the latest scan or move produced no usable
    /// samples, which ends the session with [`TerminationReason::DataLoss`].
    pub fn decide(&self, phase: NavPhase, distances: Option<&DirectionDistances>) -> NavDecision {
        match phase {
            NavPhase::Done(reason) => NavDecision::finish(reason),
            NavPhase::SeekingWall { seek_steps } => {
                let Some(distances) = distances else {
                    log::error!("Lost sensor data while seeking wall. Stopping.");
                    return NavDecision::finish(TerminationReason::DataLoss);
                };
                self.seek(seek_steps, distances)
            }
            NavPhase::FollowingWall => {
                let Some(distances) = distances else {
                    log::error!("No valid sensor data. Stopping scan.");
                    return NavDecision::finish(TerminationReason::DataLoss);
                };
                log::debug!("Sensor data: {}", distances);
                let (action, _) = self.follow_wall(distances);
                NavDecision::moving(NavPhase::FollowingWall, action)
            }
        }
    }

    fn seek(&self, seek_steps: u32, distances: &DirectionDistances) -> NavDecision {
        // Ceiling wins over a wall seen on the last allowed move
        if seek_steps >= self.config.max_seek_steps {
            log::warn!(
                "Could not find a wall within {} steps. Stopping.",
                self.config.max_seek_steps
            );
            return NavDecision::finish(TerminationReason::WallNotFound);
        }
        if distances.forward <= self.config.max_wall_distance_cm {
            log::info!(
                "Phase 2: Wall detected at {:.0} cm. Aligning for wall-following (turning left).",
                distances.forward
            );
            return NavDecision::moving(NavPhase::FollowingWall, MoveAction::Left);
        }
        log::info!(
            "Path ahead is clear (dist: {:.0} cm). Moving forward to find wall.",
            distances.forward
        );
        NavDecision::moving(
            NavPhase::SeekingWall {
                seek_steps: seek_steps + 1,
            },
            MoveAction::Forward,
        )
    }

    /// Right-hand wall-following rule. First matching rule wins.
    ///
    /// No hysteresis: a right distance hovering around either band edge can
    /// alternate between left and right turns on consecutive scans.
    pub fn follow_wall(&self, distances: &DirectionDistances) -> (MoveAction, FollowRule) {
        let c = &self.config;
        if distances.forward < c.min_distance_cm {
            log::info!(
                "Decision: Turn left (forward too close: {} cm < {} cm)",
                distances.forward,
                c.min_distance_cm
            );
            (MoveAction::Left, FollowRule::ObstacleAhead)
        } else if distances.right > c.max_wall_distance_cm {
            log::info!(
                "Decision: Turn right (right too far: {} cm > {} cm)",
                distances.right,
                c.max_wall_distance_cm
            );
            (MoveAction::Right, FollowRule::WallLost)
        } else if distances.right < c.target_wall_distance_cm {
            log::info!(
                "Decision: Turn left (right too close: {} cm < {} cm)",
                distances.right,
                c.target_wall_distance_cm
            );
            (MoveAction::Left, FollowRule::TooClose)
        } else {
            log::info!(
                "Decision: Continue forward (right distance: {} cm)",
                distances.right
            );
            (MoveAction::Forward, FollowRule::Hold)
        }
    }

    /// Post-action termination check for the wall-following phase.
    ///
    /// Loop closure requires all of: more than `loop_closure_min_steps`
    /// steps, position within one step of the start, heading within the
    /// tolerance of the start heading.
    pub fn check_termination(
        &self,
        phase: NavPhase,
        step_count: u32,
        start: &Pose,
        current: &Pose,
    ) -> Option<TerminationReason> {
        if phase != NavPhase::FollowingWall {
            return None;
        }
        let distance_to_start = current.position.distance(&start.position);
        let heading_error = heading_difference(current.heading, start.heading);
        if step_count > self.config.loop_closure_min_steps
            && distance_to_start < self.config.step_distance_m
            && heading_error < self.config.loop_closure_heading_tolerance_deg
        {
            log::info!(
                "Returned to starting position (distance: {:.2} m). Stopping scan.",
                distance_to_start
            );
            return Some(TerminationReason::LoopClosed);
        }
        if step_count >= self.config.max_steps {
            log::warn!(
                "Reached step budget ({} steps). Stopping scan.",
                self.config.max_steps
            );
            return Some(TerminationReason::StepBudgetExceeded);
        }
        None
    }
}
