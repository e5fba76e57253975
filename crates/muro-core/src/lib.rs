//! Muro Core Library
//!
//! Platform-agnostic geometry and interaction engine for the muro
//! wall-sketch editor. The view layer renders from the state exposed here
//! and dispatches pointer events and commands back into it.

pub mod camera;
pub mod fillet;
pub mod geometry;
pub mod input;
pub mod selection;
pub mod session;
pub mod snap;
pub mod wall;

pub use camera::Camera;
pub use fillet::{endpoint_connections, trim_to_intersection};
pub use geometry::{ExteriorMarker, ExteriorSide};
pub use input::MouseButton;
pub use selection::{SelectionRect, wall_in_rect};
pub use session::{EditingSession, Mode, MoveWallsPreview, MoveWallsState};
pub use snap::{ALIGNMENT_THRESHOLD, SNAP_THRESHOLD, find_alignment_points, find_nearest_point};
pub use wall::{GlassType, PlanDocument, Wall, WallId, WallWindow, WindowId, WindowPatch};
