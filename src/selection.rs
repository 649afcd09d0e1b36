//! Selection visuals and the drag state machine for move/resize/rotate.

use kurbo::{Point, Vec2};

use crate::canvas::ShapeStore;
use crate::geometry::{self, ShapeRect, rotate_point};
use crate::shapes::{Shape, ShapeId};
use crate::snap::{self, AngleFit, Snap, SnapEngine};
use crate::tools::MIN_SHAPE_SIZE;

/// Padding around a selected shape's rect, in view pixels.
pub const BOX_PADDING: f64 = 4.0;
/// Side length of a resize handle, in view pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Diameter of the rotate handle, in view pixels.
pub const ROTATE_HANDLE_SIZE: f64 = 8.0;
/// Hit tolerance around the rotate circle, in view pixels.
pub const ROTATE_CIRCLE_TOLERANCE: f64 = 5.0;

/// Corner of a selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCorner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl ResizeCorner {
    /// Sign of the corner's local coordinates relative to the center.
    fn signs(&self) -> (f64, f64) {
        match self {
            ResizeCorner::TopLeft => (-1.0, -1.0),
            ResizeCorner::TopRight => (1.0, -1.0),
            ResizeCorner::BottomRight => (1.0, 1.0),
            ResizeCorner::BottomLeft => (-1.0, 1.0),
        }
    }
}

/// What part of the selection a drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    Body,
    Resize(ResizeCorner),
    Rotate,
}

/// Geometry of the selection chrome for one shape, in canvas units.
///
/// The pixel constants are divided by the view scale so the chrome keeps
/// a constant on-screen size at any zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    /// Shape rect expanded by padding, same rotation.
    pub body: ShapeRect,
    /// Resize handle centers at the padded rect's corners.
    pub handles: [(ResizeCorner, Point); 4],
    pub handle_size: f64,
    pub rotate_center: Point,
    pub rotate_radius: f64,
    /// Where the rotate knob sits on the circle, for rendering.
    pub rotate_handle: Point,
    pub rotate_handle_size: f64,
    pub rotate_tolerance: f64,
}

/// Build the selection chrome for a shape at the given view scale.
pub fn bounding_box(shape: &Shape, view_scale: f64) -> BoundingBox {
    let body = shape.rect.expand(BOX_PADDING / view_scale);
    let corners = body.corner_points();
    let center = body.center();
    let radius = body.width.max(body.height) / std::f64::consts::SQRT_2;
    BoundingBox {
        body,
        handles: [
            (ResizeCorner::TopLeft, corners[0]),
            (ResizeCorner::TopRight, corners[1]),
            (ResizeCorner::BottomRight, corners[2]),
            (ResizeCorner::BottomLeft, corners[3]),
        ],
        handle_size: HANDLE_SIZE / view_scale,
        rotate_center: center,
        rotate_radius: radius,
        rotate_handle: geometry::local_to_canvas(Point::new(radius, 0.0), center, body.angle),
        rotate_handle_size: ROTATE_HANDLE_SIZE / view_scale,
        rotate_tolerance: ROTATE_CIRCLE_TOLERANCE / view_scale,
    }
}

/// Hit test the selection chrome. The rotate ring is checked before the
/// resize handles; the body is not considered here.
pub fn hit_test_handles(shape: &Shape, view_scale: f64, canvas_point: Point) -> Option<DragHandle> {
    let bbox = bounding_box(shape, view_scale);

    let dist = canvas_point.distance(bbox.rotate_center);
    if (dist - bbox.rotate_radius).abs() <= bbox.rotate_tolerance {
        return Some(DragHandle::Rotate);
    }

    let half = bbox.handle_size / 2.0;
    for (corner, center) in bbox.handles {
        if (canvas_point.x - center.x).abs() <= half && (canvas_point.y - center.y).abs() <= half {
            return Some(DragHandle::Resize(corner));
        }
    }
    None
}

/// Topmost shape under a canvas point. Later shapes draw on top, so the
/// list is scanned back to front.
pub fn hit_test_shapes(shapes: &[Shape], canvas_point: Point) -> Option<&Shape> {
    shapes.iter().rev().find(|s| s.contains(canvas_point))
}

/// Resize a rect by dragging one corner, keeping the opposite corner
/// fixed. Everything happens in the rect's local frame: the canvas delta
/// is rotated in, the moving corner is snapped there, and the minimum
/// size is enforced after snapping (the clamp wins over the snap).
pub fn resize_rect(start: &ShapeRect, corner: ResizeCorner, delta: Vec2, snaps: &[Snap]) -> ShapeRect {
    let (sx, sy) = corner.signs();
    let moving = Point::new(sx * start.width / 2.0, sy * start.height / 2.0);
    let fixed = Point::new(-moving.x, -moving.y);

    let local_delta = rotate_point(Point::new(delta.x, delta.y), -start.angle);
    let target = Point::new(moving.x + local_delta.x, moving.y + local_delta.y);
    let center = start.center();
    let snapped = snap::snap_handle_point(target, center, start.angle, snaps);

    let mut new_moving = snapped;
    let mut width = sx * (snapped.x - fixed.x);
    if width < MIN_SHAPE_SIZE {
        width = MIN_SHAPE_SIZE;
        new_moving.x = fixed.x + sx * MIN_SHAPE_SIZE;
    }
    let mut height = sy * (snapped.y - fixed.y);
    if height < MIN_SHAPE_SIZE {
        height = MIN_SHAPE_SIZE;
        new_moving.y = fixed.y + sy * MIN_SHAPE_SIZE;
    }

    // The midpoint of fixed and moving corners is the new center; rotate
    // the shift back out of the local frame before applying it.
    let mid_shift = Point::new((new_moving.x - moving.x) / 2.0, (new_moving.y - moving.y) / 2.0);
    let shift = rotate_point(mid_shift, start.angle);
    let new_center = Point::new(center.x + shift.x, center.y + shift.y);

    ShapeRect {
        x: new_center.x - width / 2.0,
        y: new_center.y - height / 2.0,
        width,
        height,
        angle: start.angle,
    }
}

#[derive(Debug, Clone, Copy)]
enum DragState {
    Move {
        shape_id: ShapeId,
        start_canvas: Point,
        start_rect: ShapeRect,
    },
    Resize {
        shape_id: ShapeId,
        corner: ResizeCorner,
        start_canvas: Point,
        start_rect: ShapeRect,
    },
    Rotate {
        shape_id: ShapeId,
        start_canvas: Point,
        start_rect: ShapeRect,
    },
}

/// Kind of drag currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    Move,
    Resize,
    Rotate,
}

/// Turns pointer-down/move/up into move, resize and rotate operations
/// on the store.
///
/// All updates are computed from the drag start point and the shape's
/// rect at drag start, never incrementally, so intermediate snaps and
/// clamps cannot accumulate error.
#[derive(Debug, Default)]
pub struct DragController {
    state: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self) -> Option<DragAction> {
        self.state.map(|s| match s {
            DragState::Move { .. } => DragAction::Move,
            DragState::Resize { .. } => DragAction::Resize,
            DragState::Rotate { .. } => DragAction::Rotate,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    /// Pointer down. Handle hits on the selected shape win over body
    /// hits; a body hit selects the topmost shape under the point; a
    /// miss clears the selection and starts no drag.
    pub fn begin(
        &mut self,
        store: &mut ShapeStore,
        snaps: &mut SnapEngine,
        angle_fit: &mut AngleFit,
        canvas_point: Point,
        view_scale: f64,
    ) {
        self.state = None;

        let selected_hit = store.selected_shape().map(|shape| {
            (
                shape.id,
                shape.rect,
                hit_test_handles(shape, view_scale, canvas_point),
                shape.contains(canvas_point),
            )
        });

        if let Some((shape_id, start_rect, handle, inside)) = selected_hit {
            match handle {
                Some(DragHandle::Rotate) => {
                    angle_fit.begin(store);
                    self.state = Some(DragState::Rotate {
                        shape_id,
                        start_canvas: canvas_point,
                        start_rect,
                    });
                    return;
                }
                Some(DragHandle::Resize(corner)) => {
                    snaps.begin(store);
                    self.state = Some(DragState::Resize {
                        shape_id,
                        corner,
                        start_canvas: canvas_point,
                        start_rect,
                    });
                    return;
                }
                _ => {}
            }
            if inside {
                snaps.begin(store);
                self.state = Some(DragState::Move {
                    shape_id,
                    start_canvas: canvas_point,
                    start_rect,
                });
                return;
            }
        }

        let body_hit = hit_test_shapes(store.shapes(), canvas_point).map(|s| (s.id, s.rect));
        if let Some((shape_id, start_rect)) = body_hit {
            store.select(shape_id);
            snaps.begin(store);
            self.state = Some(DragState::Move {
                shape_id,
                start_canvas: canvas_point,
                start_rect,
            });
        } else {
            store.deselect_all();
        }
    }

    /// Pointer move. Does nothing without an active drag or when the
    /// dragged shape has disappeared from the store.
    pub fn update(
        &mut self,
        store: &mut ShapeStore,
        snaps: &SnapEngine,
        angle_fit: &mut AngleFit,
        canvas_point: Point,
    ) {
        let Some(state) = self.state else {
            return;
        };
        match state {
            DragState::Move {
                shape_id,
                start_canvas,
                start_rect,
            } => {
                let mut rect = start_rect.translate(canvas_point - start_canvas);
                if let Some(diff) = snap::snap_rect(&rect, snaps.snaps()) {
                    rect = rect.translate(diff);
                }
                store.update(shape_id, |shape| shape.rect = rect);
            }
            DragState::Rotate {
                shape_id,
                start_canvas,
                start_rect,
            } => {
                let center = start_rect.center();
                let from = (start_canvas.y - center.y)
                    .atan2(start_canvas.x - center.x)
                    .to_degrees();
                let to = (canvas_point.y - center.y)
                    .atan2(canvas_point.x - center.x)
                    .to_degrees();
                let angle = angle_fit.apply(start_rect.angle + to - from);
                store.update(shape_id, |shape| shape.rect.angle = angle);
            }
            DragState::Resize {
                shape_id,
                corner,
                start_canvas,
                start_rect,
            } => {
                let rect = resize_rect(
                    &start_rect,
                    corner,
                    canvas_point - start_canvas,
                    snaps.snaps(),
                );
                store.update(shape_id, |shape| shape.rect = rect);
            }
        }
    }

    /// Pointer up. Drops the drag state and every transient helper.
    pub fn end(&mut self, snaps: &mut SnapEngine, angle_fit: &mut AngleFit) {
        self.state = None;
        snaps.clear();
        angle_fit.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn shape(x: f64, y: f64, w: f64, h: f64, angle: f64) -> Shape {
        Shape::new(ShapeKind::Rect, ShapeRect::new(x, y, w, h, angle))
    }

    #[test]
    fn test_bounding_box_scales_with_zoom() {
        let s = shape(0.0, 0.0, 40.0, 20.0, 0.0);
        let bbox = bounding_box(&s, 2.0);
        assert!((bbox.body.x + 2.0).abs() < 1e-9);
        assert!((bbox.body.width - 44.0).abs() < 1e-9);
        assert!((bbox.handle_size - 5.0).abs() < 1e-9);
        assert!((bbox.rotate_tolerance - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_hit_rotate_ring() {
        let s = shape(0.0, 0.0, 40.0, 40.0, 0.0);
        let bbox = bounding_box(&s, 1.0);
        // A point on the circle, away from any corner handle.
        let p = Point::new(bbox.rotate_center.x, bbox.rotate_center.y - bbox.rotate_radius);
        assert_eq!(hit_test_handles(&s, 1.0, p), Some(DragHandle::Rotate));
        // Just inside the tolerance band still hits.
        let p = Point::new(
            bbox.rotate_center.x,
            bbox.rotate_center.y - bbox.rotate_radius + ROTATE_CIRCLE_TOLERANCE,
        );
        assert_eq!(hit_test_handles(&s, 1.0, p), Some(DragHandle::Rotate));
        // Well off the ring misses.
        assert_eq!(hit_test_handles(&s, 1.0, bbox.rotate_center), None);
    }

    #[test]
    fn test_rotate_handle_sits_at_shape_angle() {
        // Unrotated: the knob sits on the +x axis of the circle.
        let s = shape(0.0, 0.0, 40.0, 40.0, 0.0);
        let bbox = bounding_box(&s, 1.0);
        assert!((bbox.rotate_handle.x - (bbox.rotate_center.x + bbox.rotate_radius)).abs() < 1e-9);
        assert!((bbox.rotate_handle.y - bbox.rotate_center.y).abs() < 1e-9);

        // A quarter turn carries the knob to the +y axis with it.
        let s = shape(0.0, 0.0, 40.0, 40.0, 90.0);
        let bbox = bounding_box(&s, 1.0);
        assert!((bbox.rotate_handle.x - bbox.rotate_center.x).abs() < 1e-9);
        assert!((bbox.rotate_handle.y - (bbox.rotate_center.y + bbox.rotate_radius)).abs() < 1e-9);

        // At any angle the knob stays on the circle.
        let s = shape(0.0, 0.0, 40.0, 20.0, 37.0);
        let bbox = bounding_box(&s, 1.0);
        let dist = bbox.rotate_handle.distance(bbox.rotate_center);
        assert!((dist - bbox.rotate_radius).abs() < 1e-9);
    }

    #[test]
    fn test_hit_resize_corner() {
        let s = shape(0.0, 0.0, 100.0, 40.0, 0.0);
        // Padded box top-left is (-4, -4).
        assert_eq!(
            hit_test_handles(&s, 1.0, Point::new(-4.0, -4.0)),
            Some(DragHandle::Resize(ResizeCorner::TopLeft))
        );
        assert_eq!(
            hit_test_handles(&s, 1.0, Point::new(104.0, 44.0)),
            Some(DragHandle::Resize(ResizeCorner::BottomRight))
        );
    }

    #[test]
    fn test_hit_test_shapes_topmost_wins() {
        let bottom = shape(0.0, 0.0, 50.0, 50.0, 0.0);
        let top = shape(25.0, 25.0, 50.0, 50.0, 0.0);
        let top_id = top.id;
        let shapes = vec![bottom, top];
        let hit = hit_test_shapes(&shapes, Point::new(30.0, 30.0)).unwrap();
        assert_eq!(hit.id, top_id);
    }

    #[test]
    fn test_resize_grows_from_fixed_corner() {
        let start = ShapeRect::new(0.0, 0.0, 40.0, 20.0, 0.0);
        let rect = resize_rect(&start, ResizeCorner::BottomRight, Vec2::new(10.0, 5.0), &[]);
        assert!((rect.x - 0.0).abs() < 1e-9);
        assert!((rect.y - 0.0).abs() < 1e-9);
        assert!((rect.width - 50.0).abs() < 1e-9);
        assert!((rect.height - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_top_left_moves_origin() {
        let start = ShapeRect::new(0.0, 0.0, 40.0, 20.0, 0.0);
        let rect = resize_rect(&start, ResizeCorner::TopLeft, Vec2::new(-10.0, -5.0), &[]);
        assert!((rect.x + 10.0).abs() < 1e-9);
        assert!((rect.y + 5.0).abs() < 1e-9);
        assert!((rect.width - 50.0).abs() < 1e-9);
        assert!((rect.height - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let start = ShapeRect::new(0.0, 0.0, 40.0, 20.0, 0.0);
        // Dragging far past the fixed corner pins both sides at the minimum.
        let rect = resize_rect(
            &start,
            ResizeCorner::BottomRight,
            Vec2::new(-45.0, -25.0),
            &[],
        );
        assert!((rect.width - MIN_SHAPE_SIZE).abs() < 1e-9);
        assert!((rect.height - MIN_SHAPE_SIZE).abs() < 1e-9);
        // The fixed top-left corner has not moved.
        assert!((rect.x - 0.0).abs() < 1e-9);
        assert!((rect.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_clamp_overrides_snap() {
        let start = ShapeRect::new(0.0, 0.0, 40.0, 20.0, 0.0);
        // A guide just above the minimum width pulls the moving corner
        // to x=6, but the 10 unit floor wins.
        let snaps = [Snap::X { value: 6.0 }];
        let rect = resize_rect(
            &start,
            ResizeCorner::BottomRight,
            Vec2::new(-31.0, 0.0),
            &snaps,
        );
        assert!((rect.width - MIN_SHAPE_SIZE).abs() < 1e-9);
        assert!((rect.x - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_rotated_quarter_turn() {
        // At 90 degrees the local x axis points down the canvas y axis.
        let start = ShapeRect::new(0.0, 0.0, 40.0, 20.0, 90.0);
        let rect = resize_rect(&start, ResizeCorner::BottomRight, Vec2::new(0.0, 10.0), &[]);
        assert!((rect.width - 50.0).abs() < 1e-9);
        assert!((rect.height - 20.0).abs() < 1e-9);
        assert!((rect.angle - 90.0).abs() < 1e-9);
    }

    fn setup() -> (ShapeStore, SnapEngine, AngleFit, DragController) {
        (
            ShapeStore::new(),
            SnapEngine::new(),
            AngleFit::new(),
            DragController::new(),
        )
    }

    #[test]
    fn test_drag_selects_and_moves_topmost_shape() {
        let (mut store, mut snaps, mut fit, mut drag) = setup();
        let s = shape(100.0, 100.0, 80.0, 50.0, 0.0);
        let id = s.id;
        store.add(s);

        drag.begin(
            &mut store,
            &mut snaps,
            &mut fit,
            Point::new(120.0, 120.0),
            1.0,
        );
        assert!(store.is_selected(id));
        assert_eq!(drag.action(), Some(DragAction::Move));

        drag.update(&mut store, &snaps, &mut fit, Point::new(150.0, 140.0));
        let moved = store.get(id).unwrap();
        assert!((moved.rect.x - 130.0).abs() < 1e-9);
        assert!((moved.rect.y - 120.0).abs() < 1e-9);

        drag.end(&mut snaps, &mut fit);
        assert!(!drag.is_dragging());
        assert!(snaps.snaps().is_empty());
    }

    #[test]
    fn test_body_move_snaps_to_other_top_edge() {
        let (mut store, mut snaps, mut fit, mut drag) = setup();
        let target = shape(300.0, 100.0, 60.0, 40.0, 0.0);
        store.add(target);
        let s = shape(100.0, 100.0, 80.0, 50.0, 0.0);
        let id = s.id;
        store.add(s);

        drag.begin(
            &mut store,
            &mut snaps,
            &mut fit,
            Point::new(120.0, 120.0),
            1.0,
        );
        // Raw drag leaves the top edge at y=107, within threshold of the
        // target's top edge at y=100. The snap restores exact alignment
        // while the x translation keeps its raw value.
        drag.update(&mut store, &snaps, &mut fit, Point::new(130.0, 127.0));
        let moved = store.get(id).unwrap();
        assert_eq!(moved.rect.y, 100.0);
        assert!((moved.rect.x - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_drag_applies_angle_fit() {
        let (mut store, mut snaps, mut fit, mut drag) = setup();
        let s = shape(100.0, 100.0, 40.0, 40.0, 0.0);
        let id = s.id;
        store.add(s);
        store.select(id);

        // Grab the rotate knob, which sits at the shape's angle.
        let bbox = bounding_box(store.get(id).unwrap(), 1.0);
        drag.begin(&mut store, &mut snaps, &mut fit, bbox.rotate_handle, 1.0);
        assert_eq!(drag.action(), Some(DragAction::Rotate));

        // Sweep 44 degrees; the fit pulls it to the 45 degree gridline.
        let center = bbox.rotate_center;
        let rad = 44.0f64.to_radians();
        let to = Point::new(
            center.x + bbox.rotate_radius * rad.cos(),
            center.y + bbox.rotate_radius * rad.sin(),
        );
        drag.update(&mut store, &snaps, &mut fit, to);
        let rotated = store.get(id).unwrap();
        assert!((rotated.rect.angle - 45.0).abs() < 1e-9);
        // Center is unchanged by rotation.
        let c = rotated.rect.center();
        assert!((c.x - 120.0).abs() < 1e-9);
        assert!((c.y - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_miss_clears_selection_and_starts_nothing() {
        let (mut store, mut snaps, mut fit, mut drag) = setup();
        let s = shape(100.0, 100.0, 80.0, 50.0, 0.0);
        let id = s.id;
        store.add(s);
        store.select(id);

        drag.begin(
            &mut store,
            &mut snaps,
            &mut fit,
            Point::new(500.0, 500.0),
            1.0,
        );
        assert!(!store.is_selected(id));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_update_without_drag_is_a_no_op() {
        let (mut store, snaps, mut fit, mut drag) = setup();
        let s = shape(100.0, 100.0, 80.0, 50.0, 0.0);
        let id = s.id;
        store.add(s);
        let before = store.get(id).unwrap().rect;
        drag.update(&mut store, &snaps, &mut fit, Point::new(0.0, 0.0));
        assert_eq!(store.get(id).unwrap().rect, before);
    }

    #[test]
    fn test_update_after_shape_removed_is_a_no_op() {
        let (mut store, mut snaps, mut fit, mut drag) = setup();
        let s = shape(100.0, 100.0, 80.0, 50.0, 0.0);
        let id = s.id;
        store.add(s);
        drag.begin(
            &mut store,
            &mut snaps,
            &mut fit,
            Point::new(120.0, 120.0),
            1.0,
        );
        store.remove(id);
        drag.update(&mut store, &snaps, &mut fit, Point::new(200.0, 200.0));
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_resize_drag_from_corner_handle() {
        let (mut store, mut snaps, mut fit, mut drag) = setup();
        let s = shape(100.0, 100.0, 80.0, 50.0, 0.0);
        let id = s.id;
        store.add(s);
        store.select(id);

        // Padded bottom-right handle sits at (184, 154).
        drag.begin(
            &mut store,
            &mut snaps,
            &mut fit,
            Point::new(184.0, 154.0),
            1.0,
        );
        assert_eq!(drag.action(), Some(DragAction::Resize));

        drag.update(&mut store, &snaps, &mut fit, Point::new(204.0, 164.0));
        let resized = store.get(id).unwrap();
        assert!((resized.rect.width - 100.0).abs() < 1e-9);
        assert!((resized.rect.height - 60.0).abs() < 1e-9);
        assert!((resized.rect.x - 100.0).abs() < 1e-9);
        assert!((resized.rect.y - 100.0).abs() < 1e-9);
    }
}
