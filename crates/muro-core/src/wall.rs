//! Wall entities, window attachments, and the plan document that owns them.

use crate::geometry::{self, ExteriorSide};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a wall. Assigned at creation, never reused.
pub type WallId = Uuid;
/// Stable identifier of a window attachment.
pub type WindowId = Uuid;

/// Glass pane construction of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlassType {
    #[default]
    Simple,
    Double,
}

/// A window attached to a wall.
///
/// `position` is the fractional offset along the wall (0 = start, 1 = end).
/// The engine does not clamp it; out-of-range values are the caller's
/// responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallWindow {
    pub id: WindowId,
    pub width: f64,
    pub height: f64,
    pub has_persiana: bool,
    pub color: String,
    pub glass_type: GlassType,
    pub position: f64,
}

impl WallWindow {
    /// Create a window with default attributes.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            width: 100.0,
            height: 100.0,
            has_persiana: false,
            color: "#FFFFFF".to_string(),
            glass_type: GlassType::Simple,
            position: 0.5,
        }
    }
}

impl Default for WallWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for a window; unset fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub has_persiana: Option<bool>,
    pub color: Option<String>,
    pub glass_type: Option<GlassType>,
    pub position: Option<f64>,
}

impl WindowPatch {
    /// Apply the set fields onto a window.
    pub fn apply(&self, window: &mut WallWindow) {
        if let Some(width) = self.width {
            window.width = width;
        }
        if let Some(height) = self.height {
            window.height = height;
        }
        if let Some(has_persiana) = self.has_persiana {
            window.has_persiana = has_persiana;
        }
        if let Some(color) = &self.color {
            window.color = color.clone();
        }
        if let Some(glass_type) = self.glass_type {
            window.glass_type = glass_type;
        }
        if let Some(position) = self.position {
            window.position = position;
        }
    }
}

/// A straight wall segment, the atomic drawing unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    /// Start point in world coordinates.
    pub start: Point,
    /// End point in world coordinates.
    pub end: Point,
    /// Whether the wall is part of the current selection.
    pub selected: bool,
    /// Hover highlight; selection takes visual precedence.
    #[serde(skip)]
    pub hovered: bool,
    /// Side of the normal on which the exterior marker is drawn.
    pub exterior_side: ExteriorSide,
    /// Windows attached to this wall.
    #[serde(default)]
    pub windows: Vec<WallWindow>,
}

impl Wall {
    /// Create a new wall between two points.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            selected: false,
            hovered: false,
            exterior_side: ExteriorSide::default(),
            windows: Vec::new(),
        }
    }

    /// Get the length of the wall.
    pub fn length(&self) -> f64 {
        geometry::segment_length(self.start, self.end)
    }

    /// Get the midpoint of the wall.
    pub fn midpoint(&self) -> Point {
        geometry::midpoint(self.start, self.end)
    }

    /// Both endpoints, start first.
    pub fn endpoints(&self) -> [Point; 2] {
        [self.start, self.end]
    }

    /// Translate both endpoints by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    /// Axis-aligned bounding box of the wall.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// Whether a point lies within `tolerance` of the wall segment.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let line_vec = Vec2::new(self.end.x - self.start.x, self.end.y - self.start.y);
        let point_vec = Vec2::new(point.x - self.start.x, point.y - self.start.y);

        let line_len_sq = line_vec.hypot2();
        if line_len_sq < f64::EPSILON {
            return point_vec.hypot() <= tolerance;
        }

        // Project point onto line, clamped to segment
        let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
        let projection = Point::new(self.start.x + t * line_vec.x, self.start.y + t * line_vec.y);

        ((point.x - projection.x).powi(2) + (point.y - projection.y).powi(2)).sqrt() <= tolerance
    }
}

/// The wall collection of one editing session.
///
/// Walls hold no references to each other; relationships like "connected to"
/// are recomputed from coordinates on demand, so walls can be replaced
/// wholesale without anything going stale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    walls: Vec<Wall>,
}

impl PlanDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// All walls in draw order (oldest first).
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Number of walls.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Check if the document has no walls.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Add a wall to the document.
    pub fn add_wall(&mut self, wall: Wall) -> WallId {
        let id = wall.id;
        self.walls.push(wall);
        id
    }

    /// Remove a wall from the document.
    pub fn remove_wall(&mut self, id: WallId) -> Option<Wall> {
        let index = self.walls.iter().position(|w| w.id == id)?;
        Some(self.walls.remove(index))
    }

    /// Remove all walls.
    pub fn clear(&mut self) {
        self.walls.clear();
    }

    /// Get a wall by id.
    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Get a mutable reference to a wall by id.
    pub fn wall_mut(&mut self, id: WallId) -> Option<&mut Wall> {
        self.walls.iter_mut().find(|w| w.id == id)
    }

    /// The wall most recently appended, if any.
    pub fn last_wall(&self) -> Option<&Wall> {
        self.walls.last()
    }

    pub(crate) fn last_wall_mut(&mut self) -> Option<&mut Wall> {
        self.walls.last_mut()
    }

    /// Remove the most recently appended wall.
    pub(crate) fn pop_wall(&mut self) -> Option<Wall> {
        self.walls.pop()
    }

    /// Topmost wall within `tolerance` of a world point, newest first.
    pub fn wall_at_point(&self, point: Point, tolerance: f64) -> Option<WallId> {
        self.walls
            .iter()
            .rev()
            .find(|w| w.hit_test(point, tolerance))
            .map(|w| w.id)
    }

    /// Mutable iteration over all walls.
    pub(crate) fn walls_mut(&mut self) -> impl Iterator<Item = &mut Wall> {
        self.walls.iter_mut()
    }

    /// Mark at most one wall as hovered.
    pub fn set_hovered(&mut self, id: Option<WallId>) {
        for wall in &mut self.walls {
            wall.hovered = Some(wall.id) == id;
        }
    }

    /// Select exactly one wall, clearing any previous selection.
    pub fn select_only(&mut self, id: WallId) {
        for wall in &mut self.walls {
            wall.selected = wall.id == id;
        }
    }

    /// Clear all selection flags.
    pub fn clear_selection(&mut self) {
        for wall in &mut self.walls {
            wall.selected = false;
        }
    }

    /// Walls currently selected.
    pub fn selected_walls(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter().filter(|w| w.selected)
    }

    /// Whether any wall is selected.
    pub fn has_selection(&self) -> bool {
        self.walls.iter().any(|w| w.selected)
    }

    /// The authoritative wall for contextual UI: set only when exactly one
    /// wall is selected.
    pub fn active_wall(&self) -> Option<&Wall> {
        let mut selected = self.walls.iter().filter(|w| w.selected);
        let first = selected.next()?;
        if selected.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Delete every selected wall.
    pub fn delete_selected(&mut self) {
        self.walls.retain(|w| !w.selected);
    }

    /// Translate every selected wall by a delta.
    pub fn translate_selected(&mut self, delta: Vec2) {
        for wall in &mut self.walls {
            if wall.selected {
                wall.translate(delta);
            }
        }
    }

    /// Split a wall at a point, replacing it with two fresh walls.
    ///
    /// The children get new ids and default attributes; concatenating their
    /// endpoints reconstructs the original exactly.
    pub fn split_wall(&mut self, id: WallId, at: Point) -> Option<(WallId, WallId)> {
        let wall = self.remove_wall(id)?;

        let first = Wall::new(wall.start, at);
        let second = Wall::new(at, wall.end);
        let ids = (first.id, second.id);

        log::debug!("split wall {} at ({}, {})", id, at.x, at.y);
        self.walls.push(first);
        self.walls.push(second);
        Some(ids)
    }

    /// Set a wall's length, keeping its start point and direction.
    ///
    /// Non-finite or non-positive lengths are ignored.
    pub fn set_wall_length(&mut self, id: WallId, new_length: f64) {
        if !new_length.is_finite() || new_length <= 0.0 {
            return;
        }
        let Some(wall) = self.wall_mut(id) else {
            return;
        };

        let angle = (wall.end.y - wall.start.y).atan2(wall.end.x - wall.start.x);
        wall.end = Point::new(
            wall.start.x + angle.cos() * new_length,
            wall.start.y + angle.sin() * new_length,
        );
    }

    /// Flip which side of a wall the exterior marker is drawn on.
    pub fn toggle_exterior_side(&mut self, id: WallId) {
        if let Some(wall) = self.wall_mut(id) {
            wall.exterior_side = wall.exterior_side.flipped();
        }
    }

    /// Attach a new window with default attributes to a wall.
    pub fn add_window(&mut self, wall_id: WallId) -> Option<WindowId> {
        let wall = self.wall_mut(wall_id)?;
        let window = WallWindow::new();
        let id = window.id;
        wall.windows.push(window);
        Some(id)
    }

    /// Apply a partial update to a window. Stale ids are ignored.
    pub fn update_window(&mut self, wall_id: WallId, window_id: WindowId, patch: &WindowPatch) {
        if let Some(wall) = self.wall_mut(wall_id) {
            if let Some(window) = wall.windows.iter_mut().find(|w| w.id == window_id) {
                patch.apply(window);
            }
        }
    }

    /// Detach a window from a wall. Stale ids are ignored.
    pub fn delete_window(&mut self, wall_id: WallId, window_id: WindowId) {
        if let Some(wall) = self.wall_mut(wall_id) {
            wall.windows.retain(|w| w.id != window_id);
        }
    }
}
