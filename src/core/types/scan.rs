//! Sensor sample and motion command types.
//!
//! The rover carries a single distance sensor swept through six fixed
//! angles. Angles are servo positions in degrees: 90 looks straight ahead,
//! smaller angles look to the right, larger angles to the left.

use serde::{Deserialize, Serialize};

/// A single validated range reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Servo angle in degrees.
    pub angle: f64,
    /// Measured distance in centimeters.
    pub distance: f64,
}

impl SensorSample {
    /// Create a new sample.
    #[inline]
    pub fn new(angle: f64, distance: f64) -> Self {
        Self { angle, distance }
    }

    /// Direction bucket for this sample's angle, if it has one.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_angle(self.angle)
    }
}

/// Direction bucket a sensor angle is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Forward,
    Left,
}

impl Direction {
    /// Fixed angle table. Any other angle is unclassified.
    const ANGLE_TABLE: [(f64, Direction); 6] = [
        (10.0, Direction::Right),
        (40.0, Direction::Right),
        (70.0, Direction::Forward),
        (100.0, Direction::Forward),
        (130.0, Direction::Left),
        (160.0, Direction::Left),
    ];

    /// Classify an angle by exact lookup in the angle table.
    pub fn from_angle(angle: f64) -> Option<Self> {
        Self::ANGLE_TABLE
            .iter()
            .find(|(a, _)| *a == angle)
            .map(|(_, d)| *d)
    }

    /// All sensor angles that map onto a bucket.
    pub fn sensor_angles() -> impl Iterator<Item = f64> {
        Self::ANGLE_TABLE.iter().map(|(a, _)| *a)
    }
}

/// Per-bucket minimum distance (cm). Empty buckets read as `+inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionDistances {
    pub right: f64,
    pub forward: f64,
    pub left: f64,
}

impl Default for DirectionDistances {
    fn default() -> Self {
        Self {
            right: f64::INFINITY,
            forward: f64::INFINITY,
            left: f64::INFINITY,
        }
    }
}

impl std::fmt::Display for DirectionDistances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Right={} cm, Forward={} cm, Left={} cm",
            self.right, self.forward, self.left
        )
    }
}

/// Discrete motion command understood by the rover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAction {
    /// Drive one step along the current heading.
    Forward,
    /// Rotate 90° counter-clockwise in place.
    Left,
    /// Rotate 90° clockwise in place.
    Right,
    /// Rotate 180° in place.
    Back,
}

impl MoveAction {
    /// Lowercase command name, matching the rover's endpoint names.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveAction::Forward => "forward",
            MoveAction::Left => "left",
            MoveAction::Right => "right",
            MoveAction::Back => "back",
        }
    }

    /// Whether this action displaces the rover (as opposed to turning it).
    pub fn is_translation(&self) -> bool {
        matches!(self, MoveAction::Forward)
    }
}

impl std::fmt::Display for MoveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
