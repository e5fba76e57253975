//! Pure segment geometry helpers.

use kurbo::{Point, Vec2};

/// Tolerance used when deciding that two endpoints occupy the same spot.
pub const COINCIDENT_TOLERANCE: f64 = 0.1;

/// Distance from a wall's midpoint to its exterior-side marker.
pub const MARKER_DISTANCE: f64 = 15.0;

/// Constrain `end` to lie exactly horizontal or vertical from `start`.
///
/// The axis with the larger absolute delta wins; a tie goes to vertical.
pub fn orthogonal_point(start: Point, end: Point) -> Point {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();

    if dx > dy {
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    }
}

/// Euclidean distance between two points.
pub fn segment_length(start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    (dx * dx + dy * dy).sqrt()
}

/// Midpoint of a segment.
pub fn midpoint(start: Point, end: Point) -> Point {
    Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0)
}

/// Unit normal of a segment (direction rotated 90 degrees).
///
/// Returns `None` for zero-length segments, which have no direction.
pub fn normal_vector(start: Point, end: Point) -> Option<Vec2> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return None;
    }
    Some(Vec2::new(-dy / length, dx / length))
}

/// Intersection of the two infinite lines through (`p1`,`p2`) and (`p3`,`p4`).
///
/// Returns `None` when the lines are parallel. The intersection point may
/// lie outside either segment's extent; callers accept that.
pub fn line_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let denominator = (p2.x - p1.x) * (p4.y - p3.y) - (p2.y - p1.y) * (p4.x - p3.x);
    if denominator == 0.0 {
        return None;
    }

    let t = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denominator;

    Some(Point::new(
        p1.x + t * (p2.x - p1.x),
        p1.y + t * (p2.y - p1.y),
    ))
}

/// Whether two points coincide within a per-axis tolerance.
pub fn points_equal(a: Point, b: Point, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
}

/// Which side of a wall's normal the exterior marker sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ExteriorSide {
    #[default]
    Positive,
    Negative,
}

impl ExteriorSide {
    /// The opposite side.
    pub fn flipped(self) -> Self {
        match self {
            ExteriorSide::Positive => ExteriorSide::Negative,
            ExteriorSide::Negative => ExteriorSide::Positive,
        }
    }

    fn sign(self) -> f64 {
        match self {
            ExteriorSide::Positive => 1.0,
            ExteriorSide::Negative => -1.0,
        }
    }
}

/// Placement of a wall's exterior-side marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExteriorMarker {
    /// Where the marker itself is drawn.
    pub marker_pos: Point,
    /// Start of the leader line connecting the marker to the wall.
    pub connection_start: Point,
}

/// Compute the exterior marker placement for a wall.
///
/// The marker sits at `midpoint + normal * MARKER_DISTANCE`, mirrored for
/// the negative side. `None` for zero-length walls.
pub fn exterior_marker_position(
    start: Point,
    end: Point,
    side: ExteriorSide,
) -> Option<ExteriorMarker> {
    let mid = midpoint(start, end);
    let normal = normal_vector(start, end)?;
    let direction = side.sign();

    Some(ExteriorMarker {
        marker_pos: Point::new(
            mid.x + normal.x * MARKER_DISTANCE * direction,
            mid.y + normal.y * MARKER_DISTANCE * direction,
        ),
        connection_start: mid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_horizontal_wins() {
        let result = orthogonal_point(Point::new(0.0, 0.0), Point::new(100.0, 30.0));
        assert_eq!(result, Point::new(100.0, 0.0));
    }

    #[test]
    fn test_orthogonal_vertical_wins() {
        let result = orthogonal_point(Point::new(102.0, 0.0), Point::new(100.0, 98.0));
        assert_eq!(result, Point::new(102.0, 98.0));
    }

    #[test]
    fn test_orthogonal_tie_goes_vertical() {
        let result = orthogonal_point(Point::new(0.0, 0.0), Point::new(50.0, 50.0));
        assert_eq!(result, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_orthogonal_result_is_axis_aligned() {
        let start = Point::new(13.0, -7.0);
        let end = Point::new(40.5, 2.25);
        let result = orthogonal_point(start, end);
        assert!(result.x == start.x || result.y == start.y);
    }

    #[test]
    fn test_segment_length() {
        let len = segment_length(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((len - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_midpoint() {
        let mid = midpoint(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(mid, Point::new(5.0, 10.0));
    }

    #[test]
    fn test_normal_is_unit_length() {
        let normal = normal_vector(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        assert!((normal.hypot() - 1.0).abs() < 1e-12);
        assert_eq!(normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_normal_zero_length() {
        assert!(normal_vector(Point::new(5.0, 5.0), Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_line_intersection() {
        let p = line_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, -5.0),
            Point::new(5.0, 5.0),
        )
        .unwrap();
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!((p.y - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_intersection_beyond_segment_extent() {
        // The lines through these segments cross at (20, 0), outside both.
        let p = line_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, -10.0),
            Point::new(20.0, -5.0),
        )
        .unwrap();
        assert!((p.x - 20.0).abs() < 1e-12);
        assert!((p.y - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_intersection_parallel() {
        let result = line_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_points_equal_tolerance() {
        let a = Point::new(10.0, 10.0);
        assert!(points_equal(a, Point::new(10.05, 9.95), COINCIDENT_TOLERANCE));
        assert!(!points_equal(a, Point::new(10.2, 10.0), COINCIDENT_TOLERANCE));
    }

    #[test]
    fn test_exterior_marker_positive_side() {
        let marker =
            exterior_marker_position(Point::new(0.0, 0.0), Point::new(10.0, 0.0), ExteriorSide::Positive)
                .unwrap();
        assert_eq!(marker.connection_start, Point::new(5.0, 0.0));
        assert!((marker.marker_pos.x - 5.0).abs() < 1e-12);
        assert!((marker.marker_pos.y - MARKER_DISTANCE).abs() < 1e-12);
    }

    #[test]
    fn test_exterior_marker_flips_with_side() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        let positive = exterior_marker_position(start, end, ExteriorSide::Positive).unwrap();
        let negative = exterior_marker_position(start, end, ExteriorSide::Negative).unwrap();
        assert!((positive.marker_pos.y + negative.marker_pos.y).abs() < 1e-12);
    }

    #[test]
    fn test_exterior_marker_zero_length() {
        let p = Point::new(3.0, 3.0);
        assert!(exterior_marker_position(p, p, ExteriorSide::Positive).is_none());
    }

    #[test]
    fn test_exterior_side_flipped() {
        assert_eq!(ExteriorSide::Positive.flipped(), ExteriorSide::Negative);
        assert_eq!(ExteriorSide::Negative.flipped(), ExteriorSide::Positive);
    }
}
