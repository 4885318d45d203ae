//! Draggable surface module
//!
//! Drag-to-reposition behavior shared by the collapsed ball and the open
//! panel, plus the screen-space value types behind it.

mod drag;
mod geometry;

pub use drag::{DraggableSurface, PositionSink, SmoothingSink, WriteThroughSink};
pub use geometry::{Bounds, Position};
