//! Shape definitions for the drawing surface.

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::ShapeRect;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke and fill styling for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub fill_color: SerializableColor,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 1.5,
            fill_color: SerializableColor::white(),
        }
    }
}

impl ShapeStyle {
    /// Translucent style used while a shape is still being dragged out.
    pub fn preview() -> Self {
        Self {
            stroke_color: SerializableColor::new(0, 0, 0, 128),
            stroke_width: 1.5,
            fill_color: SerializableColor::new(255, 255, 255, 77),
        }
    }
}

/// Geometric kind of a shape. Both kinds share the same rotated-rect
/// bounds; an oval is drawn inscribed in its rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect,
    Oval,
}

/// A shape on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub rect: ShapeRect,
    pub style: ShapeStyle,
}

impl Shape {
    pub fn new(kind: ShapeKind, rect: ShapeRect) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            rect,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Corner points in canvas coordinates, rotation applied.
    pub fn corner_points(&self) -> [Point; 4] {
        self.rect.corner_points()
    }

    /// Hit test against the rotated bounds.
    ///
    /// Ovals use their full bounding rect, so corners of an oval's rect
    /// count as hits too.
    pub fn contains(&self, canvas_point: Point) -> bool {
        self.rect.contains(canvas_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_roundtrip() {
        let color = SerializableColor::new(12, 34, 56, 200);
        let peniko: Color = color.into();
        let back: SerializableColor = peniko.into();
        assert_eq!(color, back);
    }

    #[test]
    fn test_new_shape_gets_unique_id() {
        let rect = ShapeRect::new(0.0, 0.0, 20.0, 20.0, 0.0);
        let a = Shape::new(ShapeKind::Rect, rect);
        let b = Shape::new(ShapeKind::Rect, rect);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_oval_hit_uses_bounding_rect() {
        let shape = Shape::new(ShapeKind::Oval, ShapeRect::new(0.0, 0.0, 40.0, 20.0, 0.0));
        // The rect corner is outside the inscribed oval but still a hit.
        assert!(shape.contains(Point::new(1.0, 1.0)));
        assert!(!shape.contains(Point::new(-1.0, 1.0)));
    }

    #[test]
    fn test_shape_serde_roundtrip() {
        let shape = Shape::new(ShapeKind::Oval, ShapeRect::new(5.0, 6.0, 30.0, 40.0, 12.5))
            .with_style(ShapeStyle::preview());
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, back);
    }
}
