//! Floor-area estimation from the walked waypoint path.
//!
//! The path is treated as a closed polygon (last waypoint joins the first)
//! and measured with the shoelace formula. This approximates the area
//! enclosed by the rover's track, not the true room boundary.

use serde::Serialize;

use crate::core::math::polygon_area;
use crate::core::types::Point2D;

/// Minimum number of waypoints for a meaningful polygon.
pub const MIN_AREA_POINTS: usize = 3;

/// Area estimate plus the data it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaEstimate {
    /// Enclosed area in square meters.
    pub area_m2: f32,
    /// Number of waypoints used.
    pub point_count: usize,
}

impl AreaEstimate {
    /// Whether the path had enough points to enclose anything.
    pub fn is_meaningful(&self) -> bool {
        self.point_count >= MIN_AREA_POINTS
    }
}

/// Estimate the enclosed area of a waypoint path.
///
/// Logs a warning and returns zero area when fewer than three points exist.
pub fn estimate_area(path: &[Point2D]) -> AreaEstimate {
    if path.len() < MIN_AREA_POINTS {
        log::warn!(
            "Insufficient path points for area calculation ({} < {})",
            path.len(),
            MIN_AREA_POINTS
        );
        return AreaEstimate {
            area_m2: 0.0,
            point_count: path.len(),
        };
    }
    AreaEstimate {
        area_m2: polygon_area(path),
        point_count: path.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn path(coords: &[(f32, f32)]) -> Vec<Point2D> {
        coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
    }

    #[test]
    fn test_unit_square_path() {
        let estimate = estimate_area(&path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]));
        assert_relative_eq!(estimate.area_m2, 1.0, epsilon = 1e-6);
        assert_eq!(estimate.point_count, 4);
        assert!(estimate.is_meaningful());
    }

    #[test]
    fn test_too_few_points() {
        let estimate = estimate_area(&path(&[(0.0, 0.0), (0.0, 0.5)]));
        assert_eq!(estimate.area_m2, 0.0);
        assert!(!estimate.is_meaningful());
        assert_eq!(estimate_area(&[]).area_m2, 0.0);
    }

    #[test]
    fn test_invariant_to_cyclic_rotation() {
        let polygons = [
            path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]),
            path(&[(0.0, 0.0), (-1.5, 0.0), (-1.5, -2.0), (0.5, -2.0), (0.5, -0.5)]),
            path(&[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)]),
        ];
        for polygon in polygons {
            let reference = estimate_area(&polygon).area_m2;
            for shift in 1..polygon.len() {
                let mut rotated = polygon.clone();
                rotated.rotate_left(shift);
                assert_relative_eq!(estimate_area(&rotated).area_m2, reference, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_invariant_to_reversal() {
        let polygon = path(&[(0.0, 0.0), (-1.5, 0.0), (-1.5, -2.0), (0.5, -2.0), (0.5, -0.5)]);
        let mut reversed = polygon.clone();
        reversed.reverse();
        assert_relative_eq!(
            estimate_area(&polygon).area_m2,
            estimate_area(&reversed).area_m2,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_repeated_closing_point_adds_nothing() {
        // A loop that returns to its start appends the origin a second time
        let open = path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let mut closed = open.clone();
        closed.push(Point2D::origin());
        assert_relative_eq!(
            estimate_area(&closed).area_m2,
            estimate_area(&open).area_m2,
            epsilon = 1e-6
        );
    }
}
