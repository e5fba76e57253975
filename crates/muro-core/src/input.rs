//! Pointer input bookkeeping shared by the editing session.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double-clicks from a stream of left-button presses.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
}

impl ClickTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click at a screen position; returns true when it completes
    /// a double-click.
    pub fn register_click(&mut self, position: Point) -> bool {
        let now = Instant::now();

        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position)
        {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = position.distance(last_pos);

            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                // Reset so a triple-click is not another double-click.
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }

        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    /// Forget the pending click.
    pub fn reset(&mut self) {
        self.last_click_time = None;
        self.last_click_position = None;
    }
}
