//! Geometry primitives for the dead-reckoned path.

use super::types::{Heading, Point2D};

/// Absolute difference between two headings in degrees, in [0, 180].
///
/// # Example
/// ```
/// use room_scanner::core::math::heading_difference;
/// use room_scanner::core::types::Heading;
///
/// assert_eq!(heading_difference(Heading::North, Heading::West), 90.0);
/// assert_eq!(heading_difference(Heading::East, Heading::West), 180.0);
/// ```
#[inline]
pub fn heading_difference(a: Heading, b: Heading) -> f32 {
    let diff = (a.degrees() as i32 - b.degrees() as i32).rem_euclid(360);
    diff.min(360 - diff) as f32
}

/// Signed shoelace sum over a closed polygon, divided by two.
///
/// Positive for counter-clockwise vertex order. The last vertex wraps to
/// the first.
pub fn signed_polygon_area(points: &[Point2D]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    // Accumulate in f64; long paths of half-meter steps lose precision in f32
    let mut sum = 0.0f64;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        sum += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    (sum / 2.0) as f32
}

/// Enclosed area of a closed polygon (shoelace formula).
///
/// Returns 0.0 for fewer than three vertices.
///
/// # Example
/// ```
/// use room_scanner::core::math::polygon_area;
/// use room_scanner::core::types::Point2D;
///
/// let square = [
///     Point2D::new(0.0, 0.0),
///     Point2D::new(0.0, 1.0),
///     Point2D::new(1.0, 1.0),
///     Point2D::new(1.0, 0.0),
/// ];
/// assert_eq!(polygon_area(&square), 1.0);
/// ```
#[inline]
pub fn polygon_area(points: &[Point2D]) -> f32 {
    signed_polygon_area(points).abs()
}
