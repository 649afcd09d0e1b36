//! Tool selection and drag-to-create shape flow.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::canvas::ShapeStore;
use crate::geometry::ShapeRect;
use crate::shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};

/// Smallest committed side length for a shape.
pub const MIN_SHAPE_SIZE: f64 = 10.0;

/// Smallest side length while a creation drag is in progress. Kept tiny
/// so the preview tracks the pointer from the very first pixel.
pub const MIN_DRAG_SIZE: f64 = 1.0;

/// Active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    /// Freehand stroke capture.
    Pen,
    /// Pan the view with a single touch.
    Hand,
    /// Select and manipulate shapes.
    #[default]
    Select,
    /// Drag out a new rectangle.
    CreateRect,
    /// Drag out a new oval.
    CreateOval,
}

impl ToolKind {
    /// The shape kind a creation tool produces, if any.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::CreateRect => Some(ShapeKind::Rect),
            ToolKind::CreateOval => Some(ShapeKind::Oval),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CreatingState {
    shape_id: ShapeId,
    start_canvas: Point,
}

/// Drag-to-create state for the rect and oval tools.
///
/// The shape goes into the store immediately with a translucent preview
/// style; committing on release swaps in the final style and enforces
/// the minimum size. Both styles are plain fields so the host can
/// install its own defaults.
#[derive(Debug)]
pub struct ShapeCreator {
    state: Option<CreatingState>,
    pub preview_style: ShapeStyle,
    pub final_style: ShapeStyle,
}

impl Default for ShapeCreator {
    fn default() -> Self {
        Self {
            state: None,
            preview_style: ShapeStyle::preview(),
            final_style: ShapeStyle::default(),
        }
    }
}

impl ShapeCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Start a creation drag at a canvas point.
    pub fn begin(&mut self, store: &mut ShapeStore, kind: ShapeKind, canvas_point: Point) {
        let rect = ShapeRect::from_corners(canvas_point, canvas_point, MIN_DRAG_SIZE);
        let shape = Shape::new(kind, rect).with_style(self.preview_style);
        let shape_id = shape.id;
        store.add(shape);
        self.state = Some(CreatingState {
            shape_id,
            start_canvas: canvas_point,
        });
    }

    /// Stretch the preview to span the start point and the current point.
    pub fn update(&mut self, store: &mut ShapeStore, canvas_point: Point) {
        let Some(state) = self.state else {
            return;
        };
        let rect = ShapeRect::from_corners(state.start_canvas, canvas_point, MIN_DRAG_SIZE);
        store.update(state.shape_id, |shape| shape.rect = rect);
    }

    /// Commit the shape: enforce the minimum size and drop the preview
    /// style. Returns the created shape's id.
    pub fn end(&mut self, store: &mut ShapeStore) -> Option<ShapeId> {
        let state = self.state.take()?;
        let style = self.final_style;
        store.update(state.shape_id, |shape| {
            shape.rect.width = shape.rect.width.max(MIN_SHAPE_SIZE);
            shape.rect.height = shape.rect.height.max(MIN_SHAPE_SIZE);
            shape.style = style;
        });
        Some(state.shape_id)
    }
}
