//! The editing session: one explicit value holding the document, the camera,
//! the tool mode, and every transient indicator. The view layer feeds
//! screen-space pointer events and commands in, and renders from the state
//! it reads back out.

use crate::camera::Camera;
use crate::fillet;
use crate::geometry::{self, COINCIDENT_TOLERANCE, ExteriorMarker};
use crate::input::{ClickTracker, MouseButton};
use crate::selection::{self, SelectionRect};
use crate::snap::{self, ALIGNMENT_THRESHOLD, HOVER_SNAP_FACTOR, SNAP_THRESHOLD};
use crate::wall::{PlanDocument, Wall, WallId, WindowId, WindowPatch};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Walls at or below this length when drawing finishes are treated as
/// accidental clicks and discarded.
pub const MIN_WALL_LENGTH: f64 = 5.0;
/// Hit tolerance for clicking a wall, in world units at zoom 1.
pub const WALL_HIT_TOLERANCE: f64 = 10.0;
/// Hit tolerance for grabbing an endpoint handle, in world units at zoom 1.
pub const HANDLE_HIT_TOLERANCE: f64 = 6.0;

/// Tool modes. Transitions are explicit user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Select,
    Draw,
    Split,
    Pan,
    MoveWalls,
    Fillet,
}

/// Which endpoint of a wall a handle drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallEndpoint {
    Start,
    End,
}

/// An endpoint handle drag in progress.
#[derive(Debug, Clone, Copy)]
pub struct EndpointDrag {
    pub wall_id: WallId,
    pub endpoint: WallEndpoint,
}

/// Sub-state of the two-click move-walls gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveWallsState {
    /// First click: where the move starts from.
    pub base_point: Option<Point>,
    /// Live destination under the pointer (snap-adjusted).
    pub destination_point: Option<Point>,
    /// Snap indicator for the pointer position.
    pub snap_point: Option<Point>,
}

impl MoveWallsState {
    /// Whether the base point is set and the gesture awaits its second click.
    pub fn awaiting_destination(&self) -> bool {
        self.base_point.is_some()
    }
}

/// Ghost geometry for rendering the move-walls gesture.
#[derive(Debug, Clone)]
pub struct MoveWallsPreview {
    pub base_point: Point,
    pub destination_point: Point,
    /// Translated copies of each selected wall's endpoints.
    pub ghost_walls: Vec<(Point, Point)>,
}

/// One editing session over a wall document.
///
/// Every operation runs to completion synchronously inside the event that
/// triggered it; there is exactly one mutator and no partial state is
/// observable between gestures.
#[derive(Debug)]
pub struct EditingSession {
    /// The wall collection being edited.
    pub document: PlanDocument,
    /// View transform.
    pub camera: Camera,
    viewport_size: Size,
    mode: Mode,
    orthogonal: bool,
    drawing: bool,
    snap_point: Option<Point>,
    alignment_points: Vec<Point>,
    selection_rect: Option<SelectionRect>,
    fillet_candidate: Option<WallId>,
    move_walls: MoveWallsState,
    endpoint_drag: Option<EndpointDrag>,
    /// Screen-space anchor of an active middle-button pan.
    middle_pan_anchor: Option<Point>,
    /// Screen-space anchor of an active pan-mode drag.
    pan_anchor: Option<Point>,
    hovered_wall: Option<WallId>,
    clicks: ClickTracker,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self {
            document: PlanDocument::new(),
            camera: Camera::new(),
            viewport_size: Size::new(800.0, 600.0),
            mode: Mode::default(),
            orthogonal: false,
            drawing: false,
            snap_point: None,
            alignment_points: Vec::new(),
            selection_rect: None,
            fillet_candidate: None,
            move_walls: MoveWallsState::default(),
            endpoint_drag: None,
            middle_pan_anchor: None,
            pan_anchor: None,
            hovered_wall: None,
            clicks: ClickTracker::new(),
        }
    }
}

impl EditingSession {
    /// Create a session with an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size used as the anchor for centered zooming.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    // --- Read access for the view layer ---

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_orthogonal(&self) -> bool {
        self.orthogonal
    }

    /// Whether a draw gesture is between pointer-down and pointer-up.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// The active endpoint-snap indicator, if any.
    pub fn snap_point(&self) -> Option<Point> {
        self.snap_point
    }

    /// Alignment-guide anchor points for the point under edit.
    pub fn alignment_points(&self) -> &[Point] {
        &self.alignment_points
    }

    /// The rubber-band rectangle of an active selection drag.
    pub fn selection_rect(&self) -> Option<&SelectionRect> {
        self.selection_rect.as_ref()
    }

    /// The first wall clicked in an unfinished fillet gesture.
    pub fn fillet_candidate(&self) -> Option<WallId> {
        self.fillet_candidate
    }

    /// The wall under the pointer in select/split mode.
    pub fn hovered_wall(&self) -> Option<WallId> {
        self.hovered_wall
    }

    /// The move-walls sub-state (base point, destination, snap indicator).
    pub fn move_walls_state(&self) -> &MoveWallsState {
        &self.move_walls
    }

    /// Whether an endpoint handle drag is in progress.
    pub fn is_dragging_endpoint(&self) -> bool {
        self.endpoint_drag.is_some()
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// Exterior marker placement for a wall, if it has nonzero length.
    pub fn exterior_marker(&self, id: WallId) -> Option<ExteriorMarker> {
        let wall = self.document.wall(id)?;
        geometry::exterior_marker_position(wall.start, wall.end, wall.exterior_side)
    }

    /// Ghost geometry for the move-walls gesture, once a base point exists.
    pub fn move_walls_preview(&self) -> Option<MoveWallsPreview> {
        if self.mode != Mode::MoveWalls {
            return None;
        }
        let base_point = self.move_walls.base_point?;
        let destination_point = self.move_walls.destination_point?;
        let delta = destination_point - base_point;

        let ghost_walls = self
            .document
            .selected_walls()
            .map(|w| (w.start + delta, w.end + delta))
            .collect();

        Some(MoveWallsPreview {
            base_point,
            destination_point,
            ghost_walls,
        })
    }

    // --- Commands ---

    /// Switch tool mode, cancelling any in-progress sub-protocol.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            log::debug!("mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.cancel_transient();
    }

    /// Toggle the orthogonal drawing constraint.
    pub fn toggle_orthogonal(&mut self) {
        self.orthogonal = !self.orthogonal;
    }

    /// Delete every selected wall.
    pub fn delete_selected(&mut self) {
        self.document.delete_selected();
        self.drop_stale_ids();
    }

    /// Reset the document, the camera, and every transient indicator.
    pub fn clear_all(&mut self) {
        log::debug!("clear all");
        self.document.clear();
        self.camera.reset();
        self.cancel_transient();
        self.hovered_wall = None;
        self.clicks.reset();
    }

    /// Zoom in one step, anchored at the viewport center.
    pub fn zoom_in(&mut self) {
        self.camera.zoom_in(self.viewport_center());
    }

    /// Zoom out one step, anchored at the viewport center.
    pub fn zoom_out(&mut self) {
        self.camera.zoom_out(self.viewport_center());
    }

    /// Restore the default zoom and pan.
    pub fn reset_zoom(&mut self) {
        self.camera.reset();
    }

    /// Wheel zoom anchored at the pointer.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        self.camera.wheel(screen, delta_y);
    }

    /// Set a wall's length, keeping its start point and direction.
    pub fn set_wall_length(&mut self, id: WallId, new_length: f64) {
        self.document.set_wall_length(id, new_length);
    }

    /// Flip which side of a wall the exterior marker is on.
    pub fn toggle_exterior_side(&mut self, id: WallId) {
        self.document.toggle_exterior_side(id);
    }

    /// Attach a default window to a wall.
    pub fn add_window(&mut self, wall_id: WallId) -> Option<WindowId> {
        self.document.add_window(wall_id)
    }

    /// Apply a partial update to a window.
    pub fn update_window(&mut self, wall_id: WallId, window_id: WindowId, patch: &WindowPatch) {
        self.document.update_window(wall_id, window_id, patch);
    }

    /// Detach a window from a wall.
    pub fn delete_window(&mut self, wall_id: WallId, window_id: WindowId) {
        self.document.delete_window(wall_id, window_id);
    }

    // --- Pointer events (screen coordinates) ---

    pub fn pointer_down(&mut self, screen: Point, button: MouseButton) {
        match button {
            MouseButton::Middle => {
                // Middle-button panning works in any mode.
                self.middle_pan_anchor = Some(screen);
                return;
            }
            MouseButton::Right => return,
            MouseButton::Left => {}
        }

        let is_double_click = self.clicks.register_click(screen);
        let world = self.camera.screen_to_world(screen);

        // Endpoint handles take precedence over the mode's own gesture.
        if let Some(drag) = self.find_endpoint_handle(world) {
            self.endpoint_drag = Some(drag);
            return;
        }

        match self.mode {
            Mode::Select => self.select_pointer_down(world),
            Mode::Draw => self.draw_pointer_down(world),
            Mode::Split => {
                if is_double_click {
                    self.split_at(world);
                }
            }
            Mode::Pan => self.pan_anchor = Some(screen),
            Mode::MoveWalls => self.move_walls_pointer_down(world),
            Mode::Fillet => self.fillet_pointer_down(world),
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if let Some(anchor) = self.middle_pan_anchor {
            self.camera.pan(screen - anchor);
            self.middle_pan_anchor = Some(screen);
            return;
        }

        let world = self.camera.screen_to_world(screen);

        if self.endpoint_drag.is_some() {
            // A handle drag never also pans the viewport.
            self.endpoint_drag_move(world);
            return;
        }

        if let Some(anchor) = self.pan_anchor {
            self.camera.pan(screen - anchor);
            self.pan_anchor = Some(screen);
            return;
        }

        if let Some(rect) = &mut self.selection_rect {
            rect.update(world);
            return;
        }

        match self.mode {
            Mode::Draw => self.draw_pointer_move(world),
            Mode::MoveWalls => self.move_walls_pointer_move(world),
            Mode::Select | Mode::Split => self.update_hover(world),
            Mode::Pan | Mode::Fillet => {}
        }
    }

    pub fn pointer_up(&mut self, screen: Point, button: MouseButton) {
        match button {
            MouseButton::Middle => {
                self.middle_pan_anchor = None;
                return;
            }
            MouseButton::Right => return,
            MouseButton::Left => {}
        }

        if self.endpoint_drag.take().is_some() {
            return;
        }
        self.pan_anchor = None;

        if let Some(mut rect) = self.selection_rect.take() {
            rect.update(self.camera.screen_to_world(screen));
            self.apply_rect_selection(&rect);
            return;
        }

        if self.mode == Mode::Draw {
            self.draw_pointer_up();
        }
    }

    // --- Per-mode handlers ---

    fn select_pointer_down(&mut self, world: Point) {
        let tolerance = WALL_HIT_TOLERANCE / self.camera.zoom;
        if let Some(id) = self.document.wall_at_point(world, tolerance) {
            // Hitting a wall consumes the event; the empty-canvas deselect
            // path below must not also run.
            self.document.select_only(id);
        } else {
            self.document.clear_selection();
            self.selection_rect = Some(SelectionRect::new(world));
        }
    }

    fn draw_pointer_down(&mut self, world: Point) {
        let threshold = SNAP_THRESHOLD / self.camera.zoom;
        let start = snap::find_nearest_point(world, None, self.document.walls(), true, threshold)
            .unwrap_or(world);

        self.document.add_wall(Wall::new(start, start));
        self.drawing = true;
    }

    fn draw_pointer_move(&mut self, pointer: Point) {
        let threshold = SNAP_THRESHOLD / self.camera.zoom;

        if !self.drawing {
            // Before the first click, show where a draw would snap to.
            self.snap_point = snap::find_nearest_point(
                pointer,
                None,
                self.document.walls(),
                true,
                threshold * HOVER_SNAP_FACTOR,
            );
            return;
        }

        let Some(current) = self.document.last_wall() else {
            return;
        };
        let current_id = current.id;
        let start = current.start;

        let mut end = if self.orthogonal {
            geometry::orthogonal_point(start, pointer)
        } else {
            pointer
        };

        let alignment_threshold = ALIGNMENT_THRESHOLD / self.camera.zoom;
        self.alignment_points = snap::find_alignment_points(
            end,
            Some(current_id),
            self.document.walls(),
            alignment_threshold,
        );
        end = snap::align_to_points(end, &self.alignment_points, alignment_threshold);

        match snap::find_nearest_point(end, Some(current_id), self.document.walls(), true, threshold)
        {
            Some(target) => {
                end = target;
                self.snap_point = Some(target);
            }
            None => {
                end = Point::new(end.x.round(), end.y.round());
                self.snap_point = None;
            }
        }

        if let Some(wall) = self.document.last_wall_mut() {
            wall.end = end;
        }
    }

    fn draw_pointer_up(&mut self) {
        if !self.drawing {
            return;
        }
        self.drawing = false;

        // One final snap validation of the finished endpoint.
        let threshold = SNAP_THRESHOLD / self.camera.zoom;
        if let Some(current) = self.document.last_wall() {
            let current_id = current.id;
            if let Some(target) = snap::find_nearest_point(
                current.end,
                Some(current_id),
                self.document.walls(),
                true,
                threshold,
            ) {
                if let Some(wall) = self.document.last_wall_mut() {
                    wall.end = target;
                }
            }
        }

        self.snap_point = None;
        self.alignment_points.clear();

        if self
            .document
            .last_wall()
            .is_some_and(|w| w.length() <= MIN_WALL_LENGTH)
        {
            log::debug!("discarding wall below minimum length");
            self.document.pop_wall();
        }
    }

    fn split_at(&mut self, world: Point) {
        let tolerance = WALL_HIT_TOLERANCE / self.camera.zoom;
        if let Some(id) = self.document.wall_at_point(world, tolerance) {
            self.document.split_wall(id, world);
            self.hovered_wall = None;
            self.document.set_hovered(None);
        }
    }

    fn fillet_pointer_down(&mut self, world: Point) {
        let tolerance = WALL_HIT_TOLERANCE / self.camera.zoom;
        let Some(id) = self.document.wall_at_point(world, tolerance) else {
            return;
        };

        match self.fillet_candidate {
            Some(candidate) if self.document.wall(candidate).is_none() => {
                // Candidate went stale (deleted); start over with this wall.
                self.fillet_candidate = Some(id);
            }
            Some(candidate) if candidate != id => {
                fillet::trim_to_intersection(&mut self.document, candidate, id);
                self.fillet_candidate = None;
            }
            Some(_) => {}
            None => self.fillet_candidate = Some(id),
        }
    }

    fn move_walls_pointer_down(&mut self, world: Point) {
        if !self.document.has_selection() {
            // Nothing to move: fall back to ordinary rectangle selection.
            self.select_pointer_down(world);
            return;
        }

        let clicked = self.move_walls.snap_point.unwrap_or(world);

        if let Some(base) = self.move_walls.base_point {
            let delta = clicked - base;
            log::debug!("move walls by ({}, {})", delta.x, delta.y);
            self.document.translate_selected(delta);
            self.move_walls = MoveWallsState::default();
            self.set_mode(Mode::Select);
        } else {
            self.move_walls = MoveWallsState {
                base_point: Some(clicked),
                destination_point: None,
                snap_point: None,
            };
        }
    }

    fn move_walls_pointer_move(&mut self, world: Point) {
        let threshold = SNAP_THRESHOLD / self.camera.zoom;
        let snap_point =
            snap::find_nearest_point(world, None, self.document.walls(), true, threshold);

        self.move_walls.snap_point = snap_point;
        self.move_walls.destination_point = Some(snap_point.unwrap_or(world));
    }

    fn endpoint_drag_move(&mut self, world: Point) {
        let Some(drag) = self.endpoint_drag else {
            return;
        };
        let Some(wall) = self.document.wall(drag.wall_id) else {
            self.endpoint_drag = None;
            return;
        };

        let origin = match drag.endpoint {
            WallEndpoint::Start => wall.start,
            WallEndpoint::End => wall.end,
        };

        let threshold = SNAP_THRESHOLD / self.camera.zoom;
        let target = snap::find_nearest_point(
            world,
            Some(drag.wall_id),
            self.document.walls(),
            true,
            threshold,
        )
        .unwrap_or(world);

        // Every selected wall sharing this corner moves with it, so shared
        // vertices stay shared.
        for wall in self.document.walls_mut() {
            if !wall.selected {
                continue;
            }
            if geometry::points_equal(wall.start, origin, COINCIDENT_TOLERANCE) {
                wall.start = target;
            }
            if geometry::points_equal(wall.end, origin, COINCIDENT_TOLERANCE) {
                wall.end = target;
            }
        }
    }

    // --- Helpers ---

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_size.width / 2.0, self.viewport_size.height / 2.0)
    }

    fn find_endpoint_handle(&self, world: Point) -> Option<EndpointDrag> {
        let tolerance = HANDLE_HIT_TOLERANCE / self.camera.zoom;
        for wall in self.document.walls().iter().rev() {
            if !wall.selected {
                continue;
            }
            if wall.start.distance(world) <= tolerance {
                return Some(EndpointDrag {
                    wall_id: wall.id,
                    endpoint: WallEndpoint::Start,
                });
            }
            if wall.end.distance(world) <= tolerance {
                return Some(EndpointDrag {
                    wall_id: wall.id,
                    endpoint: WallEndpoint::End,
                });
            }
        }
        None
    }

    fn apply_rect_selection(&mut self, rect: &SelectionRect) {
        for wall in self.document.walls_mut() {
            wall.selected = selection::wall_in_rect(wall, rect);
        }
    }

    fn update_hover(&mut self, world: Point) {
        let tolerance = WALL_HIT_TOLERANCE / self.camera.zoom;
        self.hovered_wall = self.document.wall_at_point(world, tolerance);
        self.document.set_hovered(self.hovered_wall);
    }

    /// Cancel any in-progress gesture or pending sub-protocol state.
    fn cancel_transient(&mut self) {
        if self.drawing {
            self.draw_pointer_up();
        }
        self.snap_point = None;
        self.alignment_points.clear();
        self.selection_rect = None;
        self.fillet_candidate = None;
        self.move_walls = MoveWallsState::default();
        self.endpoint_drag = None;
        self.pan_anchor = None;
    }

    /// Clear transient references to walls that no longer exist.
    fn drop_stale_ids(&mut self) {
        if let Some(candidate) = self.fillet_candidate {
            if self.document.wall(candidate).is_none() {
                self.fillet_candidate = None;
            }
        }
        if let Some(hovered) = self.hovered_wall {
            if self.document.wall(hovered).is_none() {
                self.hovered_wall = None;
            }
        }
    }
}
