//! Viewport geometry: rectangles, spherical bearings and projections

pub mod rect;
pub mod spherical;

pub use rect::{Rect, MIRRORED_FRAME};
pub use spherical::{position_angle_and_distance, project_orthographic, project_perspective};
