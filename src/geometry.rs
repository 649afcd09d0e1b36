//! Rotated rectangle geometry shared by shapes, snapping and selection.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Rotate a point about the origin by an angle in degrees.
pub fn rotate_point(p: Point, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Convert a point in a shape's local frame (origin at the shape center,
/// axes following the shape rotation) to canvas coordinates.
pub fn local_to_canvas(local: Point, center: Point, angle: f64) -> Point {
    let rotated = rotate_point(local, angle);
    Point::new(rotated.x + center.x, rotated.y + center.y)
}

/// Convert a canvas point into a shape's local frame.
pub fn canvas_to_local(canvas: Point, center: Point, angle: f64) -> Point {
    let translated = Point::new(canvas.x - center.x, canvas.y - center.y);
    rotate_point(translated, -angle)
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Whether an angle is a multiple of 90 degrees (within a small epsilon).
pub fn is_axis_aligned(angle: f64) -> bool {
    let rem = normalize_angle(angle) % 90.0;
    rem < 1e-9 || (90.0 - rem) < 1e-9
}

/// Axis-aligned position plus rotation, the storage form of every shape.
///
/// `x`/`y` locate the top-left corner of the unrotated rectangle; `angle`
/// rotates the rectangle about its center, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl ShapeRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            angle,
        }
    }

    /// Build an unrotated rect spanning two drag points, with each side
    /// clamped to `min_size`.
    pub fn from_corners(p1: Point, p2: Point, min_size: f64) -> Self {
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p1.x - p2.x).abs().max(min_size),
            height: (p1.y - p2.y).abs().max(min_size),
            angle: 0.0,
        }
    }

    /// Square rect centered on a point, used for handle hit areas.
    pub fn centered_on(center: Point, size: f64) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
            angle: 0.0,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corner points in canvas coordinates, rotation applied.
    ///
    /// Order is fixed: top-left, top-right, bottom-right, bottom-left.
    pub fn corner_points(&self) -> [Point; 4] {
        let center = self.center();
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            local_to_canvas(Point::new(-hw, -hh), center, self.angle),
            local_to_canvas(Point::new(hw, -hh), center, self.angle),
            local_to_canvas(Point::new(hw, hh), center, self.angle),
            local_to_canvas(Point::new(-hw, hh), center, self.angle),
        ]
    }

    /// Grow the rect by `padding` on every side, keeping center and angle.
    pub fn expand(&self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
            angle: self.angle,
        }
    }

    /// Translate the rect by a canvas-space delta.
    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Whether a canvas point falls inside the rotated rect.
    pub fn contains(&self, canvas: Point) -> bool {
        let local = canvas_to_local(canvas, self.center(), self.angle);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }
}
