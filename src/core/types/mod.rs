//! Core data types for the room scanner.
//!
//! - [`Point2D`]: 2D point in meters
//! - [`Heading`]: axis-aligned compass heading
//! - [`Pose`]: position plus heading
//! - [`PoseTracker`]: fixed-step dead-reckoning update rule
//! - [`SensorSample`], [`Direction`], [`DirectionDistances`]: range readings
//! - [`MoveAction`]: discrete motion commands

mod pose;
mod pose_tracker;
mod scan;

pub use pose::{Heading, Point2D, Pose};
pub use pose_tracker::{PoseTracker, PoseUpdate};
pub use scan::{Direction, DirectionDistances, MoveAction, SensorSample};
