//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level at session start and after a reset.
pub const INITIAL_ZOOM: f64 = 1.0;
/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.2;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom step applied by the zoom-in/zoom-out commands.
pub const BUTTON_ZOOM_FACTOR: f64 = 1.2;
/// Zoom step applied per wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;

/// Camera manages the view transform for the drawing surface.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: INITIAL_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to world before zoom
        let world_point = self.screen_to_world(screen_point);

        // Apply new zoom
        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        let correction = Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
        self.offset += correction;
    }

    /// Zoom in one step, anchored at the given screen point.
    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom_at(anchor, BUTTON_ZOOM_FACTOR);
    }

    /// Zoom out one step, anchored at the given screen point.
    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom_at(anchor, 1.0 / BUTTON_ZOOM_FACTOR);
    }

    /// Wheel zoom anchored at the pointer position.
    ///
    /// A negative `delta_y` (wheel up) zooms in, positive zooms out.
    pub fn wheel(&mut self, pointer: Point, delta_y: f64) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 {
            WHEEL_ZOOM_FACTOR
        } else {
            1.0 / WHEEL_ZOOM_FACTOR
        };
        self.zoom_at(pointer, factor);
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = INITIAL_ZOOM;
    }
}
