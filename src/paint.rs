//! Freehand stroke capture for the pen tool.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::shapes::ShapeStyle;

/// A committed freehand stroke in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub style: ShapeStyle,
}

impl Stroke {
    pub fn new(start: Point) -> Self {
        Self {
            points: vec![start],
            style: ShapeStyle::default(),
        }
    }
}

/// Collects pen input. The active stroke is kept separate from the
/// committed ones so a pinch gesture can cancel it without touching
/// finished work.
#[derive(Debug, Default)]
pub struct PaintState {
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
}

impl PaintState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn begin(&mut self, canvas_point: Point) {
        self.active = Some(Stroke::new(canvas_point));
    }

    pub fn add_point(&mut self, canvas_point: Point) {
        if let Some(stroke) = &mut self.active {
            stroke.points.push(canvas_point);
        }
    }

    /// Finish the active stroke. Single-point strokes are kept; a tap
    /// leaves a dot.
    pub fn commit(&mut self) {
        if let Some(stroke) = self.active.take() {
            self.strokes.push(stroke);
        }
    }

    /// Discard the active stroke, typically because a second touch
    /// turned the interaction into a view gesture.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }
}
