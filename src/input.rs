//! Touch input tracking: raw touch frames in, derived events out.

use kurbo::Point;

use crate::camera::Camera;
use crate::gesture::{self, GestureState, TouchPoint};

/// How much the tracker is allowed to move the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// Touches never move the camera.
    Disabled,
    /// Two-finger gestures move the camera; a single touch is left to
    /// the active tool.
    #[default]
    MultiTouchOnly,
    /// Single-touch pans and two-finger gestures both move the camera.
    Enabled,
}

/// Event derived from a raw touch frame. Point-carrying events include
/// both view and canvas coordinates so consumers never re-derive them
/// against a camera that has already moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    TouchStart { view: Point, canvas: Point },
    TouchMove { view: Point, canvas: Point },
    TouchEnd { view: Point, canvas: Point },
    /// Fired on every frame a two-touch gesture begins or is active.
    GestureStart,
    /// Fired when a second touch appears while a single touch was
    /// already down. Carries the new touch's position.
    MultiTouchStart { view: Point, canvas: Point },
}

/// Tracks the touch configuration across frames, applies view gestures
/// to the camera, and emits the derived event stream.
#[derive(Debug, Default)]
pub struct GestureTracker {
    pub mode: GestureMode,
    state: GestureState,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Process a touch-start frame carrying every active touch.
    pub fn touch_start(&mut self, touches: &[TouchPoint], camera: &Camera) -> Vec<InputEvent> {
        let mut events = Vec::new();
        match touches {
            [] => {
                self.state = GestureState::Idle;
            }
            [touch] => {
                let view = touch.point();
                events.push(InputEvent::TouchStart {
                    view,
                    canvas: camera.view_to_canvas(view),
                });
                self.state = GestureState::SingleTouch { touch: *touch };
            }
            [first, second, ..] => {
                if let GestureState::SingleTouch { touch: existing } = &self.state {
                    // Report the touch that newly joined, not the one
                    // that was already down.
                    let added = if second.id != existing.id { second } else { first };
                    let view = added.point();
                    events.push(InputEvent::MultiTouchStart {
                        view,
                        canvas: camera.view_to_canvas(view),
                    });
                }
                events.push(InputEvent::GestureStart);
                self.state = GestureState::DoubleTouch {
                    touches: [*first, *second],
                    center: gesture::touch_center(first, second),
                };
            }
        }
        events
    }

    /// Process a touch-move frame, mutating the camera when the mode
    /// allows it.
    pub fn touch_move(&mut self, touches: &[TouchPoint], camera: &mut Camera) -> Vec<InputEvent> {
        let mut events = Vec::new();
        match touches {
            [] => {}
            [touch] => {
                if let GestureState::SingleTouch { touch: prev } = &self.state {
                    if self.mode == GestureMode::Enabled {
                        camera.pan(touch.point() - prev.point());
                    }
                }
                let view = touch.point();
                events.push(InputEvent::TouchMove {
                    view,
                    canvas: camera.view_to_canvas(view),
                });
                self.state = GestureState::SingleTouch { touch: *touch };
            }
            [first, second, ..] => {
                let next = [*first, *second];
                let next_center = gesture::touch_center(first, second);
                match &self.state {
                    GestureState::DoubleTouch { touches: prev, center } => {
                        if self.mode == GestureMode::Disabled {
                            self.state = GestureState::DoubleTouch {
                                touches: next,
                                center: next_center,
                            };
                        } else {
                            let result =
                                gesture::apply_pinch_gesture(prev, *center, &next, camera);
                            *camera = result.camera;
                            self.state = GestureState::DoubleTouch {
                                touches: next,
                                center: result.center,
                            };
                        }
                    }
                    // A move frame can arrive before its start frame;
                    // anchor here and transform from the next one.
                    _ => {
                        self.state = GestureState::DoubleTouch {
                            touches: next,
                            center: next_center,
                        };
                    }
                }
                events.push(InputEvent::GestureStart);
            }
        }
        events
    }

    /// Process a touch-end frame carrying the touches that remain down.
    pub fn touch_end(&mut self, remaining: &[TouchPoint], camera: &Camera) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if remaining.is_empty() {
            if let GestureState::SingleTouch { touch } = &self.state {
                let view = touch.point();
                events.push(InputEvent::TouchEnd {
                    view,
                    canvas: camera.view_to_canvas(view),
                });
            }
            self.state = GestureState::Idle;
            return events;
        }
        match remaining {
            [touch] => {
                self.state = GestureState::SingleTouch { touch: *touch };
            }
            [first, second, ..] => {
                self.state = GestureState::DoubleTouch {
                    touches: [*first, *second],
                    center: gesture::touch_center(first, second),
                };
            }
            [] => {}
        }
        events
    }
}
