//! Rectangular selection with CAD-style window/crossing semantics.
//!
//! Drag direction decides the rule: dragging right-to-left (negative width)
//! is a "window" selection that requires full containment, dragging
//! left-to-right is a "crossing" selection that takes anything the
//! rectangle touches.

use crate::wall::Wall;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Outcodes for the Cohen-Sutherland trivial accept/reject test.
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// An in-progress rubber-band rectangle, anchored at the drag start.
///
/// `width` and `height` are signed; the sign of `width` encodes the drag
/// direction and therefore the selection rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectionRect {
    /// Drag start corner, in world coordinates.
    pub start: Point,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Begin a selection rectangle at the drag start point.
    pub fn new(start: Point) -> Self {
        Self {
            start,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Update the moving corner to the current pointer position.
    pub fn update(&mut self, current: Point) {
        self.width = current.x - self.start.x;
        self.height = current.y - self.start.y;
    }

    /// Window selection (full containment) when dragged leftward.
    pub fn is_window_selection(&self) -> bool {
        self.width < 0.0
    }

    /// The normalized rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_points(
            self.start,
            Point::new(self.start.x + self.width, self.start.y + self.height),
        )
    }
}

/// Whether a wall is taken by the selection rectangle.
///
/// A degenerate rectangle (zero width or height) selects nothing.
pub fn wall_in_rect(wall: &Wall, selection: &SelectionRect) -> bool {
    if selection.width == 0.0 || selection.height == 0.0 {
        return false;
    }

    let rect = selection.rect();

    if selection.is_window_selection() {
        point_in_rect(wall.start, rect) && point_in_rect(wall.end, rect)
    } else {
        segment_intersects_rect(wall.start, wall.end, rect)
    }
}

fn point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

fn outcode(point: Point, rect: Rect) -> u8 {
    let mut code = INSIDE;
    if point.x < rect.x0 {
        code |= LEFT;
    } else if point.x > rect.x1 {
        code |= RIGHT;
    }
    if point.y < rect.y0 {
        code |= TOP;
    } else if point.y > rect.y1 {
        code |= BOTTOM;
    }
    code
}

/// Segment-rectangle intersection via outcodes plus edge checks.
fn segment_intersects_rect(p1: Point, p2: Point, rect: Rect) -> bool {
    let code1 = outcode(p1, rect);
    let code2 = outcode(p2, rect);

    // Trivial accept: an endpoint inside the rectangle.
    if code1 == INSIDE || code2 == INSIDE {
        return true;
    }
    // Trivial reject: both endpoints beyond the same side.
    if code1 & code2 != 0 {
        return false;
    }

    // Non-trivial case: test against each rectangle edge. Vertical and
    // horizontal segments skip the axis they cannot cross, so no division
    // by a zero delta happens.
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    if dx != 0.0 {
        for edge_x in [rect.x0, rect.x1] {
            let t = (edge_x - p1.x) / dx;
            if (0.0..=1.0).contains(&t) {
                let y = p1.y + t * dy;
                if y >= rect.y0 && y <= rect.y1 {
                    return true;
                }
            }
        }
    }

    if dy != 0.0 {
        for edge_y in [rect.y0, rect.y1] {
            let t = (edge_y - p1.y) / dy;
            if (0.0..=1.0).contains(&t) {
                let x = p1.x + t * dx;
                if x >= rect.x0 && x <= rect.x1 {
                    return true;
                }
            }
        }
    }

    false
}
