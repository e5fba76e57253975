//! Trim two walls so they meet exactly at their intersection ("fillet").

use crate::geometry::{self, COINCIDENT_TOLERANCE};
use crate::wall::{PlanDocument, Wall, WallId};
use kurbo::Point;

/// Whether each endpoint of `wall` coincides with an endpoint of any wall in
/// `others`, within the coincidence tolerance.
///
/// Connectivity is always derived from current coordinates; nothing stores a
/// reference to the connected wall.
pub fn endpoint_connections(wall: &Wall, others: &[&Wall]) -> (bool, bool) {
    let mut start_connected = false;
    let mut end_connected = false;

    for other in others {
        if other.id == wall.id {
            continue;
        }
        for endpoint in other.endpoints() {
            if geometry::points_equal(wall.start, endpoint, COINCIDENT_TOLERANCE) {
                start_connected = true;
            }
            if geometry::points_equal(wall.end, endpoint, COINCIDENT_TOLERANCE) {
                end_connected = true;
            }
        }
    }

    (start_connected, end_connected)
}

/// Trim walls `first` and `second` to their infinite-line intersection.
///
/// For each wall independently: a single connected endpoint keeps its place
/// and the free endpoint moves; with no connections the endpoint closer to
/// the intersection moves; with both endpoints connected the wall is left
/// untouched (trimming would break an existing junction). Parallel walls,
/// stale ids, and `first == second` are no-ops.
pub fn trim_to_intersection(document: &mut PlanDocument, first: WallId, second: WallId) {
    if first == second {
        return;
    }
    let (Some(first_wall), Some(second_wall)) =
        (document.wall(first).cloned(), document.wall(second).cloned())
    else {
        log::debug!("fillet skipped: stale wall id");
        return;
    };

    // Connectivity against every wall other than the two being trimmed.
    let others: Vec<&Wall> = document
        .walls()
        .iter()
        .filter(|w| w.id != first && w.id != second)
        .collect();
    let first_connections = endpoint_connections(&first_wall, &others);
    let second_connections = endpoint_connections(&second_wall, &others);
    drop(others);

    let Some(intersection) = geometry::line_intersection(
        first_wall.start,
        first_wall.end,
        second_wall.start,
        second_wall.end,
    ) else {
        log::debug!("fillet skipped: walls {} and {} are parallel", first, second);
        return;
    };

    trim_wall(document, first, first_connections, intersection);
    trim_wall(document, second, second_connections, intersection);
}

fn trim_wall(
    document: &mut PlanDocument,
    id: WallId,
    connections: (bool, bool),
    intersection: Point,
) {
    let Some(wall) = document.wall_mut(id) else {
        return;
    };

    let move_start = match connections {
        (true, false) => false,
        (false, true) => true,
        (false, false) => {
            wall.start.distance(intersection) < wall.end.distance(intersection)
        }
        // Both endpoints sit on junctions; nothing can move safely.
        (true, true) => return,
    };

    if move_start {
        wall.start = intersection;
    } else {
        wall.end = intersection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_endpoint_connections() {
        let subject = wall(0.0, 0.0, 100.0, 0.0);
        let touches_start = wall(0.0, 0.0, 0.0, 50.0);
        let unrelated = wall(300.0, 300.0, 400.0, 300.0);

        let others = vec![&touches_start, &unrelated];
        assert_eq!(endpoint_connections(&subject, &others), (true, false));
    }

    #[test]
    fn test_endpoint_connections_within_tolerance() {
        let subject = wall(0.0, 0.0, 100.0, 0.0);
        let near_end = wall(100.05, 0.05, 150.0, 50.0);

        let others = vec![&near_end];
        assert_eq!(endpoint_connections(&subject, &others), (false, true));
    }

    #[test]
    fn test_fillet_moves_free_endpoint() {
        let mut doc = PlanDocument::new();
        let a = doc.add_wall(wall(0.0, 0.0, 100.0, 0.0));
        let b = doc.add_wall(wall(50.0, 40.0, 50.0, 100.0));
        // Anchors A's start so only its end is free.
        doc.add_wall(wall(0.0, 0.0, 0.0, 50.0));

        trim_to_intersection(&mut doc, a, b);

        let a = doc.wall(a).unwrap();
        assert_eq!(a.start, Point::new(0.0, 0.0));
        assert_eq!(a.end, Point::new(50.0, 0.0));

        let b = doc.wall(b).unwrap();
        assert_eq!(b.start, Point::new(50.0, 0.0));
        assert_eq!(b.end, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_fillet_unconnected_moves_closer_endpoint() {
        let mut doc = PlanDocument::new();
        let a = doc.add_wall(wall(0.0, 0.0, 100.0, 0.0));
        let b = doc.add_wall(wall(120.0, 10.0, 120.0, 200.0));

        trim_to_intersection(&mut doc, a, b);

        // Intersection is at (120, 0): A's end and B's start are closer.
        let a = doc.wall(a).unwrap();
        assert_eq!(a.start, Point::new(0.0, 0.0));
        assert_eq!(a.end, Point::new(120.0, 0.0));

        let b = doc.wall(b).unwrap();
        assert_eq!(b.start, Point::new(120.0, 0.0));
        assert_eq!(b.end, Point::new(120.0, 200.0));
    }

    #[test]
    fn test_fillet_both_connected_is_untouched() {
        let mut doc = PlanDocument::new();
        let a = doc.add_wall(wall(0.0, 0.0, 100.0, 0.0));
        let b = doc.add_wall(wall(50.0, 40.0, 50.0, 100.0));
        doc.add_wall(wall(0.0, 0.0, 0.0, 50.0));
        doc.add_wall(wall(100.0, 0.0, 100.0, 50.0));

        trim_to_intersection(&mut doc, a, b);

        // A is anchored at both ends and must not move; B still trims.
        let a = doc.wall(a).unwrap();
        assert_eq!(a.start, Point::new(0.0, 0.0));
        assert_eq!(a.end, Point::new(100.0, 0.0));

        let b = doc.wall(b).unwrap();
        assert_eq!(b.start, Point::new(50.0, 0.0));
    }

    #[test]
    fn test_fillet_shared_vertex_is_unchanged() {
        // Two walls already meeting at (10, 0): the intersection equals the
        // shared vertex, so trimming changes nothing.
        let mut doc = PlanDocument::new();
        let a = doc.add_wall(wall(0.0, 0.0, 10.0, 0.0));
        let b = doc.add_wall(wall(10.0, 0.0, 10.0, 10.0));

        trim_to_intersection(&mut doc, a, b);

        let a = doc.wall(a).unwrap();
        assert_eq!(a.start, Point::new(0.0, 0.0));
        assert_eq!(a.end, Point::new(10.0, 0.0));

        let b = doc.wall(b).unwrap();
        assert_eq!(b.start, Point::new(10.0, 0.0));
        assert_eq!(b.end, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_fillet_parallel_is_noop() {
        let mut doc = PlanDocument::new();
        let a = doc.add_wall(wall(0.0, 0.0, 100.0, 0.0));
        let b = doc.add_wall(wall(0.0, 50.0, 100.0, 50.0));

        trim_to_intersection(&mut doc, a, b);

        assert_eq!(doc.wall(a).unwrap().end, Point::new(100.0, 0.0));
        assert_eq!(doc.wall(b).unwrap().end, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_fillet_stale_id_is_noop() {
        let mut doc = PlanDocument::new();
        let a = doc.add_wall(wall(0.0, 0.0, 100.0, 0.0));

        trim_to_intersection(&mut doc, a, Uuid::new_v4());
        trim_to_intersection(&mut doc, a, a);

        assert_eq!(doc.wall(a).unwrap().end, Point::new(100.0, 0.0));
    }
}
