//! Pose and point types for grid-aligned dead reckoning.

use serde::{Deserialize, Serialize};

/// A 2D point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters (east)
    pub x: f32,
    /// Y coordinate in meters (north)
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin, where every session starts.
    #[inline]
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Compass heading of the rover, restricted to the four axis directions.
///
/// Degrees grow clockwise: 0 = north (+y), 90 = east (+x),
/// 180 = south (-y), 270 = west (-x).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Heading in degrees, one of {0, 90, 180, 270}.
    #[inline]
    pub fn degrees(self) -> u16 {
        match self {
            Heading::North => 0,
            Heading::East => 90,
            Heading::South => 180,
            Heading::West => 270,
        }
    }

    /// Build a heading from any multiple of 90 degrees (negative allowed).
    ///
    /// Returns `None` for angles that are not axis aligned.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Heading::North),
            90 => Some(Heading::East),
            180 => Some(Heading::South),
            270 => Some(Heading::West),
            _ => None,
        }
    }

    /// Rotate by a signed multiple of 90 degrees (positive = clockwise).
    #[inline]
    fn rotated(self, delta: i32) -> Self {
        let degrees = (self.degrees() as i32 + delta).rem_euclid(360);
        // rem_euclid of a multiple of 90 stays axis aligned
        Self::from_degrees(degrees).unwrap_or(self)
    }

    /// Heading after a 90° left turn: (h - 90) mod 360.
    #[inline]
    pub fn turned_left(self) -> Self {
        self.rotated(-90)
    }

    /// Heading after a 90° right turn: (h + 90) mod 360.
    #[inline]
    pub fn turned_right(self) -> Self {
        self.rotated(90)
    }

    /// Heading after turning around: (h + 180) mod 360.
    #[inline]
    pub fn reversed(self) -> Self {
        self.rotated(180)
    }

    /// Unit displacement for one step along this heading.
    #[inline]
    pub fn unit_vector(self) -> (f32, f32) {
        match self {
            Heading::North => (0.0, 1.0),
            Heading::East => (1.0, 0.0),
            Heading::South => (0.0, -1.0),
            Heading::West => (-1.0, 0.0),
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Rover pose: position in meters plus axis-aligned heading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position in meters relative to the session start.
    pub position: Point2D,
    /// Current heading.
    pub heading: Heading,
}

impl Pose {
    /// Create a new pose.
    #[inline]
    pub fn new(position: Point2D, heading: Heading) -> Self {
        Self { position, heading }
    }

    /// Pose at the origin facing north.
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) @ {}",
            self.position.x, self.position.y, self.heading
        )
    }
}
