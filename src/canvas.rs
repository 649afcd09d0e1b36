//! The shape store and the canvas aggregate that wires input, camera,
//! tools and snapping together.

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::gesture::TouchPoint;
use crate::input::{GestureMode, GestureTracker, InputEvent};
use crate::paint::PaintState;
use crate::selection::{self, DragAction, DragController};
use crate::shapes::{Shape, ShapeId};
use crate::snap::{AngleFit, SnapEngine};
use crate::tools::{ShapeCreator, ToolKind};

/// Insertion-ordered shape collection with single selection.
///
/// Order doubles as z-order: later shapes draw (and hit test) on top.
/// Every mutation bumps a revision counter so consumers can cheaply
/// detect staleness without diffing.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    selected_ids: Vec<ShapeId>,
    #[serde(skip)]
    revision: u64,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Insert a shape, or replace it in place when the id already
    /// exists (keeping its z-order).
    pub fn add(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
        self.revision += 1;
    }

    /// Mutate a shape through a closure. Returns false (and does
    /// nothing) when the id is unknown.
    pub fn update(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape)) -> bool {
        match self.shapes.iter_mut().find(|s| s.id == id) {
            Some(shape) => {
                f(shape);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let pos = self.shapes.iter().position(|s| s.id == id)?;
        self.selected_ids.retain(|&s| s != id);
        self.revision += 1;
        Some(self.shapes.remove(pos))
    }

    /// Select a single shape. Unknown ids clear the selection instead.
    pub fn select(&mut self, id: ShapeId) {
        if self.get(id).is_some() {
            self.selected_ids = vec![id];
        } else {
            self.selected_ids.clear();
        }
        self.revision += 1;
    }

    pub fn deselect_all(&mut self) {
        if !self.selected_ids.is_empty() {
            self.selected_ids.clear();
            self.revision += 1;
        }
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected_ids.contains(&id)
    }

    pub fn selected_ids(&self) -> &[ShapeId] {
        &self.selected_ids
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected_ids.first().and_then(|&id| self.get(id))
    }
}

/// Everything needed to run the drawing surface, short of rendering.
///
/// Raw touch frames go into `touch_start`/`touch_move`/`touch_end`; the
/// tracker turns them into derived events which are routed to the
/// active tool.
#[derive(Debug, Default)]
pub struct Canvas {
    pub store: ShapeStore,
    pub camera: Camera,
    pub tracker: GestureTracker,
    pub drag: DragController,
    pub snaps: SnapEngine,
    pub angle_fit: AngleFit,
    pub creator: ShapeCreator,
    pub paint: PaintState,
    tool: ToolKind,
}

impl Canvas {
    pub fn new() -> Self {
        let mut canvas = Self::default();
        canvas.set_tool(ToolKind::default());
        canvas
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. The hand tool is the only one that claims the
    /// single touch for panning; everyone else keeps two-finger view
    /// gestures only.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.tracker.mode = match tool {
            ToolKind::Hand => GestureMode::Enabled,
            _ => GestureMode::MultiTouchOnly,
        };
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        let events = self.tracker.touch_start(touches, &self.camera);
        self.dispatch(events);
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) {
        let events = self.tracker.touch_move(touches, &mut self.camera);
        self.dispatch(events);
    }

    pub fn touch_end(&mut self, remaining: &[TouchPoint]) {
        let events = self.tracker.touch_end(remaining, &self.camera);
        self.dispatch(events);
    }

    fn dispatch(&mut self, events: Vec<InputEvent>) {
        for event in events {
            match event {
                InputEvent::TouchStart { canvas, .. } => match self.tool {
                    ToolKind::Pen => self.paint.begin(canvas),
                    ToolKind::Select => self.drag.begin(
                        &mut self.store,
                        &mut self.snaps,
                        &mut self.angle_fit,
                        canvas,
                        self.camera.scale,
                    ),
                    ToolKind::CreateRect | ToolKind::CreateOval => {
                        if let Some(kind) = self.tool.shape_kind() {
                            self.creator.begin(&mut self.store, kind, canvas);
                        }
                    }
                    ToolKind::Hand => {}
                },
                InputEvent::TouchMove { canvas, .. } => match self.tool {
                    ToolKind::Pen => self.paint.add_point(canvas),
                    ToolKind::Select => self.drag.update(
                        &mut self.store,
                        &self.snaps,
                        &mut self.angle_fit,
                        canvas,
                    ),
                    ToolKind::CreateRect | ToolKind::CreateOval => {
                        self.creator.update(&mut self.store, canvas);
                    }
                    ToolKind::Hand => {}
                },
                InputEvent::TouchEnd { .. } => match self.tool {
                    ToolKind::Pen => self.paint.commit(),
                    ToolKind::Select => self.drag.end(&mut self.snaps, &mut self.angle_fit),
                    ToolKind::CreateRect | ToolKind::CreateOval => {
                        self.creator.end(&mut self.store);
                    }
                    ToolKind::Hand => {}
                },
                InputEvent::GestureStart => {
                    // A view gesture takes over the interaction; an
                    // in-flight pen stroke is abandoned, not committed.
                    self.paint.cancel();
                }
                InputEvent::MultiTouchStart { canvas, .. } => {
                    // A second tap during a move or resize drag toggles
                    // the tapped shape in or out of the snap targets.
                    if matches!(
                        self.drag.action(),
                        Some(DragAction::Move | DragAction::Resize)
                    ) {
                        if let Some(shape) =
                            selection::hit_test_shapes(self.store.shapes(), canvas)
                        {
                            let id = shape.id;
                            self.snaps.toggle_target(&self.store, id);
                        }
                    }
                }
            }
        }
    }
}
