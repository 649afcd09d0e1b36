//! PinchPad Core Library
//!
//! Platform-agnostic geometry and interaction engine for a multi-touch
//! vector drawing canvas: pan/zoom/rotate view gestures, shape
//! manipulation with handles, and magnetic snapping.

pub mod camera;
pub mod canvas;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod paint;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, ShapeStore};
pub use geometry::ShapeRect;
pub use gesture::{GestureState, PinchResult, TouchPoint, apply_pinch_gesture};
pub use input::{GestureMode, GestureTracker, InputEvent};
pub use paint::{PaintState, Stroke};
pub use selection::{
    BoundingBox, DragAction, DragController, DragHandle, ResizeCorner, bounding_box,
};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use snap::{
    ANGLE_FIT_TOLERANCE, AngleFit, SNAP_DISTANCE_THRESHOLD, Snap, SnapEngine, SnapHit,
    SnapTargetPolicy, resolve, snap_handle_point, snap_rect,
};
pub use tools::{MIN_SHAPE_SIZE, ShapeCreator, ToolKind};
