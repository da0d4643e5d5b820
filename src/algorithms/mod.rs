//! Algorithms layer.
//!
//! - [`area`]: shoelace area estimation over the waypoint path

pub mod area;

pub use area::{AreaEstimate, estimate_area};
