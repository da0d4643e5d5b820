//! Dead-reckoning pose updates under a fixed step model.
//!
//! The tracker holds only its step length; the current pose and the
//! waypoint path are owned by the session and passed in on every call.

use super::{MoveAction, Point2D, Pose};

/// Result of applying one confirmed action to a pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseUpdate {
    /// Pose after the action.
    pub pose: Pose,
    /// New waypoint to append to the path (forward moves only).
    pub waypoint: Option<Point2D>,
}

/// Applies confirmed moves and turns to a pose.
///
/// Exactly one of position or heading changes per action:
/// - `forward` moves one step along the heading axis and yields a waypoint
/// - `left` / `right` / `back` rotate in place and yield no waypoint
///
/// # Example
///
/// ```
/// use room_scanner::core::types::{MoveAction, Pose, PoseTracker};
///
/// let tracker = PoseTracker::new(0.5);
/// let mut path = vec![Pose::identity().position];
///
/// let pose = tracker.commit(&Pose::identity(), MoveAction::Forward, &mut path);
/// assert_eq!(pose.position.y, 0.5);
/// assert_eq!(path.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PoseTracker {
    /// Distance covered by one forward move (meters).
    step_distance_m: f32,
}

impl PoseTracker {
    /// Create a tracker for the given step length in meters.
    pub fn new(step_distance_m: f32) -> Self {
        Self { step_distance_m }
    }

    /// Step length in meters.
    pub fn step_distance(&self) -> f32 {
        self.step_distance_m
    }

    /// Compute the pose that follows `pose` after `action`.
    pub fn apply(&self, pose: &Pose, action: MoveAction) -> PoseUpdate {
        match action {
            MoveAction::Forward => {
                let (ux, uy) = pose.heading.unit_vector();
                let position = Point2D::new(
                    pose.position.x + ux * self.step_distance_m,
                    pose.position.y + uy * self.step_distance_m,
                );
                PoseUpdate {
                    pose: Pose::new(position, pose.heading),
                    waypoint: Some(position),
                }
            }
            MoveAction::Left => Self::rotate(pose, pose.heading.turned_left()),
            MoveAction::Right => Self::rotate(pose, pose.heading.turned_right()),
            MoveAction::Back => Self::rotate(pose, pose.heading.reversed()),
        }
    }

    /// Apply `action` and append any resulting waypoint to `path`.
    pub fn commit(&self, pose: &Pose, action: MoveAction, path: &mut Vec<Point2D>) -> Pose {
        let update = self.apply(pose, action);
        if let Some(waypoint) = update.waypoint {
            path.push(waypoint);
        }
        update.pose
    }

    fn rotate(pose: &Pose, heading: super::Heading) -> PoseUpdate {
        PoseUpdate {
            pose: Pose::new(pose.position, heading),
            waypoint: None,
        }
    }
}

impl Default for PoseTracker {
    fn default() -> Self {
        Self::new(0.5)
    }
}
