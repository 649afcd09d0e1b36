//! Two-finger pinch gesture math: simultaneous pan, zoom and rotate.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

/// One active touch point in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Stable identifier assigned by the input source.
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Tracked touch configuration between input frames.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    /// No touches are down.
    Idle,
    /// Exactly one touch is down; moving it pans the view.
    SingleTouch { touch: TouchPoint },
    /// Two touches are down; moving them drives the pinch transform.
    DoubleTouch {
        touches: [TouchPoint; 2],
        /// Midpoint of the two touches at the last processed frame.
        center: Point,
    },
}

impl Default for GestureState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Midpoint of two touches in view coordinates.
pub fn touch_center(a: &TouchPoint, b: &TouchPoint) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Distance between two touches.
pub fn touch_distance(a: &TouchPoint, b: &TouchPoint) -> f64 {
    a.point().distance(b.point())
}

/// Angle of the segment from `a` to `b`, in degrees.
pub fn touch_angle(a: &TouchPoint, b: &TouchPoint) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Result of one pinch frame: the updated camera plus the new gesture
/// center to carry into the next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchResult {
    pub camera: Camera,
    pub center: Point,
}

/// Apply one frame of a two-finger gesture to the camera.
///
/// The scale factor comes from the ratio of touch distances, the rotation
/// delta from the change in segment angle, and the pan from the midpoint
/// movement. The offset is solved so that the canvas point under the old
/// gesture center stays under the new one. If either touch pair is
/// degenerate (coincident touches) the camera is returned unchanged.
pub fn apply_pinch_gesture(
    prev: &[TouchPoint; 2],
    prev_center: Point,
    touches: &[TouchPoint; 2],
    camera: &Camera,
) -> PinchResult {
    let new_center = touch_center(&touches[0], &touches[1]);

    let prev_distance = touch_distance(&prev[0], &prev[1]);
    let new_distance = touch_distance(&touches[0], &touches[1]);
    if prev_distance < 1e-9 || new_distance < 1e-9 {
        return PinchResult {
            camera: camera.clone(),
            center: new_center,
        };
    }

    let scale = camera.scale * new_distance / prev_distance;
    let angle = camera.angle + touch_angle(&touches[0], &touches[1])
        - touch_angle(&prev[0], &prev[1]);

    // The view point that the anchor occupied before the midpoint moved.
    let center_delta = new_center - prev_center;
    let anchor = camera.view_to_canvas(new_center - center_delta);

    // Push the anchor through the new scale and rotation, then pick the
    // offset that lands it on the new center.
    let rad = angle.to_radians();
    let (sin, cos) = rad.sin_cos();
    let sx = anchor.x * scale;
    let sy = anchor.y * scale;
    let rotated = Point::new(sx * cos - sy * sin, sx * sin + sy * cos);

    PinchResult {
        camera: Camera {
            offset: new_center - rotated,
            scale,
            angle,
        },
        center: new_center,
    }
}
