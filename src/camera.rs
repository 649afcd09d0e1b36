//! Camera module for the pan/zoom/rotate view transform.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the canvas.
///
/// A canvas point is scaled, rotated about the view origin and then
/// translated by `offset` to land in view coordinates. `angle` is in
/// degrees, positive clockwise in a y-down coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub scale: f64,
    /// Current view rotation in degrees
    pub angle: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            angle: 0.0,
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
    /// This transform converts canvas coordinates to view coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset)
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts view coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        self.transform().inverse()
    }

    /// Convert a view point to canvas coordinates.
    pub fn view_to_canvas(&self, view_point: Point) -> Point {
        self.inverse_transform() * view_point
    }

    /// Convert a canvas point to view coordinates.
    pub fn canvas_to_view(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Pan the camera by a delta in view coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Reset camera to default position, zoom and rotation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
