//! Simulated rover in an empty rectangular room.
//!
//! Stands in for the HTTP controller during development and tests. The room
//! spans `[0, width] x [0, height]` meters with +y pointing north. Readings
//! are ray casts from the rover's position at the six sensor angles:
//!
//! ```text
//!            90° (ahead)
//!      130°   |   70°
//!  160°   \   |   /   40°
//!      ----\--+--/----  10°
//!   left         right
//! ```
//!
//! Forward moves that would put the rover within a small margin of a wall
//! are refused, matching a controller that stops on its bump sensor.

use serde_json::{Value, json};

use super::rover_client::{ClientError, Result, RoverCommand, RoverTransport};
use crate::core::types::{Direction, Heading, MoveAction, Point2D, Pose, PoseTracker};

/// Closest the rover body may get to a wall (meters).
const WALL_MARGIN_M: f32 = 0.05;

/// Rectangular-room rover simulator.
#[derive(Debug, Clone)]
pub struct SimulatedRover {
    width_m: f32,
    height_m: f32,
    /// Pose in room coordinates.
    pose: Pose,
    tracker: PoseTracker,
    /// Requests to fail before answering normally.
    pending_failures: u32,
    disconnected: bool,
    request_count: usize,
}

impl SimulatedRover {
    /// Create a simulator for a `width_m` x `height_m` room.
    pub fn new(width_m: f32, height_m: f32, start: Pose) -> Self {
        Self {
            width_m,
            height_m,
            pose: start,
            tracker: PoseTracker::default(),
            pending_failures: 0,
            disconnected: false,
            request_count: 0,
        }
    }

    /// Room with the rover in the middle of the south half, facing north.
    pub fn centered(width_m: f32, height_m: f32) -> Self {
        let start = Pose::new(Point2D::new(width_m / 2.0, height_m / 4.0), Heading::North);
        Self::new(width_m, height_m, start)
    }

    /// Set the distance covered by one forward move.
    pub fn with_step(mut self, step_distance_m: f32) -> Self {
        self.tracker = PoseTracker::new(step_distance_m);
        self
    }

    /// Fail the next `count` requests with a transport error.
    pub fn fail_next(&mut self, count: u32) {
        self.pending_failures = count;
    }

    /// Fail every request until reconnected.
    pub fn set_disconnected(&mut self, disconnected: bool) {
        self.disconnected = disconnected;
    }

    /// Current pose in room coordinates.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Number of requests received so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.request_count
    }

    /// Distance in centimeters from the rover to the nearest wall along a
    /// sensor angle.
    pub fn range_cm(&self, sensor_angle: f64) -> f64 {
        let bearing = (self.pose.heading.degrees() as f64 + (90.0 - sensor_angle)).to_radians();
        let (dx, dy) = (bearing.sin(), bearing.cos());
        let (px, py) = (self.pose.position.x as f64, self.pose.position.y as f64);

        let mut t = f64::INFINITY;
        if dx > 1e-9 {
            t = t.min((self.width_m as f64 - px) / dx);
        } else if dx < -1e-9 {
            t = t.min(-px / dx);
        }
        if dy > 1e-9 {
            t = t.min((self.height_m as f64 - py) / dy);
        } else if dy < -1e-9 {
            t = t.min(-py / dy);
        }
        t * 100.0
    }

    /// Readings at every sensor angle, in the controller's JSON shape.
    pub fn measurements(&self) -> Vec<Value> {
        Direction::sensor_angles()
            .map(|angle| json!({ "angle": angle as u32, "distance": self.range_cm(angle) }))
            .collect()
    }

    fn inside_margin(&self, p: Point2D) -> bool {
        p.x >= WALL_MARGIN_M
            && p.x <= self.width_m - WALL_MARGIN_M
            && p.y >= WALL_MARGIN_M
            && p.y <= self.height_m - WALL_MARGIN_M
    }
}

impl RoverTransport for SimulatedRover {
    fn request(&mut self, command: RoverCommand) -> Result<Vec<Value>> {
        self.request_count += 1;
        if self.disconnected {
            return Err(ClientError::Disconnected);
        }
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(ClientError::Status(503));
        }

        if let RoverCommand::Move(action) = command {
            let next = self.tracker.apply(&self.pose, action).pose;
            if action == MoveAction::Forward && !self.inside_margin(next.position) {
                return Err(ClientError::Rejected(format!(
                    "wall ahead at ({:.2}, {:.2})",
                    self.pose.position.x, self.pose.position.y
                )));
            }
            self.pose = next;
        }
        Ok(self.measurements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_range_straight_ahead_and_sideways() {
        let rover = SimulatedRover::new(4.0, 4.0, Pose::new(Point2D::new(1.0, 1.0), Heading::North));
        // 90° is straight ahead: 3 m to the north wall
        assert_relative_eq!(rover.range_cm(90.0), 300.0, epsilon = 1e-6);
        // 0° would be due east: 3 m to the east wall
        assert_relative_eq!(rover.range_cm(0.0), 300.0, epsilon = 1e-6);
        // 180° would be due west: 1 m
        assert_relative_eq!(rover.range_cm(180.0), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_range_follows_heading() {
        let rover = SimulatedRover::new(4.0, 4.0, Pose::new(Point2D::new(1.0, 3.0), Heading::West));
        // Facing west, ahead is the west wall and the right side is north
        assert_relative_eq!(rover.range_cm(90.0), 100.0, epsilon = 1e-6);
        assert_relative_eq!(rover.range_cm(0.0), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_measurements_cover_sensor_angles() {
        let rover = SimulatedRover::centered(4.0, 4.0);
        let raw = rover.measurements();
        assert_eq!(raw.len(), 6);
        assert!(raw.iter().all(|v| v["distance"].as_f64().is_some_and(|d| d > 0.0)));
        assert_eq!(raw[0]["angle"], 10);
    }

    #[test]
    fn test_moves_update_pose() {
        let mut rover = SimulatedRover::new(4.0, 4.0, Pose::new(Point2D::new(2.0, 2.0), Heading::North));
        rover.request(RoverCommand::Move(MoveAction::Forward)).unwrap();
        assert_eq!(rover.pose().position, Point2D::new(2.0, 2.5));
        rover.request(RoverCommand::Move(MoveAction::Right)).unwrap();
        assert_eq!(rover.pose().heading, Heading::East);
        rover.request(RoverCommand::Scan).unwrap();
        assert_eq!(rover.pose().position, Point2D::new(2.0, 2.5));
    }

    #[test]
    fn test_forward_into_wall_is_refused() {
        let mut rover = SimulatedRover::new(4.0, 4.0, Pose::new(Point2D::new(2.0, 3.6), Heading::North));
        let result = rover.request(RoverCommand::Move(MoveAction::Forward));
        assert!(matches!(result, Err(ClientError::Rejected(_))));
        assert_eq!(rover.pose().position, Point2D::new(2.0, 3.6));
        // Turning in place is always allowed
        assert!(rover.request(RoverCommand::Move(MoveAction::Back)).is_ok());
    }

    #[test]
    fn test_injected_failures() {
        let mut rover = SimulatedRover::centered(4.0, 4.0);
        rover.fail_next(2);
        assert!(rover.request(RoverCommand::Scan).is_err());
        assert!(rover.request(RoverCommand::Scan).is_err());
        assert!(rover.request(RoverCommand::Scan).is_ok());

        rover.set_disconnected(true);
        assert!(matches!(
            rover.request(RoverCommand::Scan),
            Err(ClientError::Disconnected)
        ));
        assert_eq!(rover.request_count(), 4);
    }
}
