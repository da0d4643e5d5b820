//! Per-direction minimum distance summary.
//!
//! Collapses a validated batch into the three bucket minima that the
//! navigator consumes. Samples at unclassified angles are ignored.

use crate::core::types::{Direction, DirectionDistances, SensorSample};

/// Compute the minimum distance per direction bucket.
///
/// Buckets without samples read as `+inf`.
pub fn summarize(samples: &[SensorSample]) -> DirectionDistances {
    let mut distances = DirectionDistances::default();
    for sample in samples {
        let slot = match sample.direction() {
            Some(Direction::Right) => &mut distances.right,
            Some(Direction::Forward) => &mut distances.forward,
            Some(Direction::Left) => &mut distances.left,
            None => continue,
        };
        *slot = slot.min(sample.distance);
    }
    distances
}
