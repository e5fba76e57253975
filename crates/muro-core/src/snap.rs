//! Endpoint snapping and alignment-guide queries over the wall collection.

use crate::wall::{Wall, WallId};
use kurbo::Point;

/// Distance threshold for endpoint snapping, in world units at zoom 1.
/// Call sites divide by the camera zoom so the feel is constant on screen.
pub const SNAP_THRESHOLD: f64 = 10.0;

/// Distance threshold for alignment-guide detection, per axis.
pub const ALIGNMENT_THRESHOLD: f64 = 5.0;

/// Multiplier on the snap threshold for the pre-draw hover indicator.
pub const HOVER_SNAP_FACTOR: f64 = 2.0;

/// Find the closest wall endpoint within `threshold` of a point.
///
/// Endpoints of the excluded wall are skipped, as are endpoints of selected
/// walls when `exclude_selected` is set (so a group being moved never snaps
/// to itself). Ties keep the first endpoint encountered; a later candidate
/// must be strictly closer to replace it.
pub fn find_nearest_point(
    point: Point,
    exclude_wall: Option<WallId>,
    walls: &[Wall],
    exclude_selected: bool,
    threshold: f64,
) -> Option<Point> {
    let mut nearest: Option<Point> = None;
    let mut min_distance = f64::INFINITY;

    for wall in walls {
        if exclude_wall == Some(wall.id) {
            continue;
        }
        if exclude_selected && wall.selected {
            continue;
        }

        for endpoint in wall.endpoints() {
            let distance = point.distance(endpoint);
            if distance <= threshold && distance < min_distance {
                min_distance = distance;
                nearest = Some(endpoint);
            }
        }
    }

    nearest
}

/// Collect endpoints of other walls that the given point lines up with.
///
/// An endpoint is a candidate when its x (or y) coordinate is within
/// `threshold` of the query point's x (or y). Coincident candidates are
/// emitted once.
pub fn find_alignment_points(
    point: Point,
    exclude_wall: Option<WallId>,
    walls: &[Wall],
    threshold: f64,
) -> Vec<Point> {
    let mut alignment_points: Vec<Point> = Vec::new();

    for wall in walls {
        if exclude_wall == Some(wall.id) {
            continue;
        }

        for endpoint in wall.endpoints() {
            let aligns_x = (point.x - endpoint.x).abs() < threshold;
            let aligns_y = (point.y - endpoint.y).abs() < threshold;
            if !aligns_x && !aligns_y {
                continue;
            }
            if !alignment_points
                .iter()
                .any(|p| p.x == endpoint.x && p.y == endpoint.y)
            {
                alignment_points.push(endpoint);
            }
        }
    }

    alignment_points
}

/// Clamp each axis of a point independently to the nearest alignment
/// candidate within `threshold`.
pub fn align_to_points(point: Point, alignment_points: &[Point], threshold: f64) -> Point {
    let mut aligned = point;
    let mut best_dx = threshold;
    let mut best_dy = threshold;

    for candidate in alignment_points {
        let dx = (point.x - candidate.x).abs();
        if dx < best_dx {
            best_dx = dx;
            aligned.x = candidate.x;
        }
        let dy = (point.y - candidate.y).abs();
        if dy < best_dy {
            best_dy = dy;
            aligned.y = candidate.y;
        }
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_nearest_point_within_threshold() {
        let walls = vec![wall(0.0, 0.0, 100.0, 0.0)];
        let found = find_nearest_point(Point::new(102.0, 3.0), None, &walls, true, SNAP_THRESHOLD);
        assert_eq!(found, Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_nearest_point_beyond_threshold() {
        let walls = vec![wall(0.0, 0.0, 100.0, 0.0)];
        let found = find_nearest_point(Point::new(150.0, 50.0), None, &walls, true, SNAP_THRESHOLD);
        assert!(found.is_none());
    }

    #[test]
    fn test_nearest_point_exact_match() {
        // Snap idempotence: a point near exactly one endpoint returns it exactly.
        let walls = vec![wall(0.0, 0.0, 100.0, 0.0)];
        let found = find_nearest_point(Point::new(100.0, 1.0), None, &walls, true, SNAP_THRESHOLD);
        assert_eq!(found, Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_nearest_point_picks_closest() {
        let walls = vec![wall(0.0, 0.0, 8.0, 0.0), wall(3.0, 0.0, 30.0, 0.0)];
        let found = find_nearest_point(Point::new(4.0, 0.0), None, &walls, true, SNAP_THRESHOLD);
        assert_eq!(found, Some(Point::new(3.0, 0.0)));
    }

    #[test]
    fn test_nearest_point_tie_keeps_first() {
        // Two endpoints equidistant from the query: the first in iteration
        // order wins, later equal-distance candidates do not replace it.
        let walls = vec![wall(0.0, 0.0, 0.0, 50.0), wall(8.0, 0.0, 8.0, 50.0)];
        let found = find_nearest_point(Point::new(4.0, 0.0), None, &walls, true, SNAP_THRESHOLD);
        assert_eq!(found, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_nearest_point_excludes_wall() {
        let walls = vec![wall(0.0, 0.0, 100.0, 0.0)];
        let id = walls[0].id;
        let found = find_nearest_point(Point::new(1.0, 1.0), Some(id), &walls, true, SNAP_THRESHOLD);
        assert!(found.is_none());
    }

    #[test]
    fn test_nearest_point_excludes_selected() {
        let mut walls = vec![wall(0.0, 0.0, 100.0, 0.0)];
        walls[0].selected = true;

        let near = Point::new(1.0, 1.0);
        assert!(find_nearest_point(near, None, &walls, true, SNAP_THRESHOLD).is_none());
        assert!(find_nearest_point(near, None, &walls, false, SNAP_THRESHOLD).is_some());
    }

    #[test]
    fn test_alignment_points_per_axis() {
        let walls = vec![wall(50.0, 100.0, 200.0, 300.0)];
        let points = find_alignment_points(Point::new(52.0, 10.0), None, &walls, ALIGNMENT_THRESHOLD);
        // Only the start aligns (on x); the end is far on both axes.
        assert_eq!(points, vec![Point::new(50.0, 100.0)]);
    }

    #[test]
    fn test_alignment_points_deduplicated() {
        // Two walls sharing a corner: the shared endpoint appears once.
        let walls = vec![wall(50.0, 0.0, 50.0, 50.0), wall(50.0, 50.0, 120.0, 50.0)];
        let points = find_alignment_points(Point::new(51.0, 200.0), None, &walls, ALIGNMENT_THRESHOLD);
        assert_eq!(
            points,
            vec![Point::new(50.0, 0.0), Point::new(50.0, 50.0)]
        );
    }

    #[test]
    fn test_align_to_points_clamps_each_axis() {
        let candidates = vec![Point::new(50.0, 300.0), Point::new(400.0, 80.0)];
        let aligned = align_to_points(Point::new(52.0, 78.0), &candidates, ALIGNMENT_THRESHOLD);
        assert_eq!(aligned, Point::new(50.0, 80.0));
    }

    #[test]
    fn test_align_to_points_outside_threshold() {
        let candidates = vec![Point::new(50.0, 300.0)];
        let aligned = align_to_points(Point::new(70.0, 70.0), &candidates, ALIGNMENT_THRESHOLD);
        assert_eq!(aligned, Point::new(70.0, 70.0));
    }
}
