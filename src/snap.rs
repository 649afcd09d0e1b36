//! Magnetic snapping against neighboring shapes, plus angle fitting for
//! rotation.

use std::collections::HashSet;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::canvas::ShapeStore;
use crate::geometry::{self, ShapeRect, canvas_to_local, is_axis_aligned, local_to_canvas};
use crate::shapes::ShapeId;

/// Maximum distance (canvas units) at which a snap candidate attracts a
/// point. The boundary is inclusive.
pub const SNAP_DISTANCE_THRESHOLD: f64 = 10.0;

/// Tolerance in degrees for fitting a rotation to a candidate angle.
pub const ANGLE_FIT_TOLERANCE: f64 = 6.0;

/// One snap candidate.
///
/// Axis-aligned edges produce `X`/`Y` guides, rotated edges produce
/// `Line` guides, and corners always produce `Point` anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Snap {
    /// Vertical guide at a fixed x.
    X { value: f64 },
    /// Horizontal guide at a fixed y.
    Y { value: f64 },
    /// Infinite line through two points.
    Line { p1: Point, p2: Point },
    /// A single anchor point.
    Point { p: Point },
}

impl Snap {
    /// Weight multiplied into the distance when competing candidates are
    /// ranked. Lower wins, so point snaps beat guides at equal distance.
    pub fn priority(&self) -> f64 {
        match self {
            Snap::Point { .. } => 1.0,
            Snap::X { .. } | Snap::Y { .. } => 1.5,
            Snap::Line { .. } => 2.0,
        }
    }

    /// Deduplication key. Two candidates with the same key attract
    /// identically, so only the first is kept.
    fn key(&self) -> String {
        match self {
            Snap::X { value } => format!("x:{value}"),
            Snap::Y { value } => format!("y:{value}"),
            Snap::Line { p1, p2 } => format!("line:{},{},{},{}", p1.x, p1.y, p2.x, p2.y),
            Snap::Point { p } => format!("point:{},{}", p.x, p.y),
        }
    }

    /// Closest point of this candidate to `point`.
    ///
    /// Lines use an unclamped projection, so the attraction extends past
    /// the generating edge's endpoints.
    pub fn nearest(&self, point: Point) -> Point {
        match self {
            Snap::X { value } => Point::new(*value, point.y),
            Snap::Y { value } => Point::new(point.x, *value),
            Snap::Point { p } => *p,
            Snap::Line { p1, p2 } => {
                let edge = *p2 - *p1;
                let len_sq = edge.hypot2();
                if len_sq < 1e-12 {
                    return *p1;
                }
                let t = (point - *p1).dot(edge) / len_sq;
                *p1 + edge * t
            }
        }
    }
}

/// Winning candidate for a resolved point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapHit {
    pub snap: Snap,
    pub nearest: Point,
    pub distance: f64,
}

/// Pick the best candidate for a point, or `None` when nothing is within
/// the threshold. Candidates are ranked by distance times priority.
pub fn resolve(point: Point, snaps: &[Snap]) -> Option<SnapHit> {
    let mut best: Option<(f64, SnapHit)> = None;
    for snap in snaps {
        let nearest = snap.nearest(point);
        let distance = point.distance(nearest);
        if distance > SNAP_DISTANCE_THRESHOLD {
            continue;
        }
        let weighted = distance * snap.priority();
        if best.is_none_or(|(b, _)| weighted < b) {
            best = Some((
                weighted,
                SnapHit {
                    snap: *snap,
                    nearest,
                    distance,
                },
            ));
        }
    }
    if let Some((weighted, hit)) = &best {
        log::debug!(
            "snap resolved: {:?} at distance {:.2} (weighted {weighted:.2})",
            hit.snap,
            hit.distance
        );
    }
    best.map(|(_, hit)| hit)
}

/// Find the rigid translation that snaps a rect into place, using its
/// four corners as anchors. The globally best (corner, candidate) pair
/// wins; every corner moves by the same delta so the rect never deforms.
pub fn snap_rect(rect: &ShapeRect, snaps: &[Snap]) -> Option<Vec2> {
    let mut best: Option<(f64, Vec2)> = None;
    for corner in rect.corner_points() {
        for snap in snaps {
            let nearest = snap.nearest(corner);
            let distance = corner.distance(nearest);
            if distance > SNAP_DISTANCE_THRESHOLD {
                continue;
            }
            let weighted = distance * snap.priority();
            if best.is_none_or(|(b, _)| weighted < b) {
                best = Some((weighted, nearest - corner));
            }
        }
    }
    if let Some((weighted, diff)) = &best {
        log::debug!(
            "shape snap: translating by ({:.2}, {:.2}) (weighted {weighted:.2})",
            diff.x,
            diff.y
        );
    }
    best.map(|(_, diff)| diff)
}

/// Snap a resize handle expressed in a shape's local frame.
///
/// The local point is converted to canvas coordinates, resolved against
/// the candidates, and converted back. Without a hit the input is
/// returned unchanged.
pub fn snap_handle_point(local: Point, center: Point, angle: f64, snaps: &[Snap]) -> Point {
    let canvas = local_to_canvas(local, center, angle);
    match resolve(canvas, snaps) {
        Some(hit) => canvas_to_local(hit.nearest, center, angle),
        None => local,
    }
}

fn same_rotation_class(a: f64, b: f64) -> bool {
    let ra = geometry::normalize_angle(a) % 90.0;
    let rb = geometry::normalize_angle(b) % 90.0;
    let diff = (ra - rb).abs();
    diff < 1e-9 || (90.0 - diff) < 1e-9
}

/// Which shapes start out as snap targets when a drag begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapTargetPolicy {
    /// Every non-selected shape attracts.
    #[default]
    All,
    /// Nothing attracts until targets are toggled in by hand.
    Selected,
}

/// Collects snap candidates for the current drag and tracks which shapes
/// participate as targets.
#[derive(Debug, Default)]
pub struct SnapEngine {
    snaps: Vec<Snap>,
    target_ids: Vec<ShapeId>,
    pub policy: SnapTargetPolicy,
}

impl SnapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snaps(&self) -> &[Snap] {
        &self.snaps
    }

    pub fn is_target(&self, id: ShapeId) -> bool {
        self.target_ids.contains(&id)
    }

    /// Start a drag session, seeding the target set per the policy.
    pub fn begin(&mut self, store: &ShapeStore) {
        self.target_ids = match self.policy {
            SnapTargetPolicy::All => store
                .shapes()
                .iter()
                .filter(|s| !store.is_selected(s.id))
                .map(|s| s.id)
                .collect(),
            SnapTargetPolicy::Selected => Vec::new(),
        };
        self.rebuild(store);
    }

    /// Toggle a single shape in or out of the target set mid-drag.
    pub fn toggle_target(&mut self, store: &ShapeStore, id: ShapeId) {
        if store.is_selected(id) {
            return;
        }
        if let Some(pos) = self.target_ids.iter().position(|&t| t == id) {
            self.target_ids.remove(pos);
            log::debug!("snap target removed: {id}");
        } else {
            self.target_ids.push(id);
            log::debug!("snap target added: {id}");
        }
        self.rebuild(store);
    }

    /// Drop all candidates at the end of a drag.
    pub fn clear(&mut self) {
        self.snaps.clear();
        self.target_ids.clear();
    }

    fn rebuild(&mut self, store: &ShapeStore) {
        self.snaps.clear();
        let mut seen = HashSet::new();
        let mut push = |snaps: &mut Vec<Snap>, snap: Snap| {
            let key = snap.key();
            if seen.insert(key) {
                snaps.push(snap);
            } else {
                log::debug!("duplicate snap candidate dropped: {}", snap.key());
            }
        };

        let selected = store.selected_shape();

        // The selected shape contributes guides for its own top and left
        // edges so a drag can settle back onto the starting alignment.
        if let Some(shape) = selected {
            let corners = shape.corner_points();
            if is_axis_aligned(shape.rect.angle) {
                let (min_x, min_y) = min_corner(&corners);
                push(&mut self.snaps, Snap::X { value: min_x });
                push(&mut self.snaps, Snap::Y { value: min_y });
            } else {
                push(
                    &mut self.snaps,
                    Snap::Line {
                        p1: corners[0],
                        p2: corners[1],
                    },
                );
                push(
                    &mut self.snaps,
                    Snap::Line {
                        p1: corners[0],
                        p2: corners[3],
                    },
                );
            }
        }

        for shape in store.shapes() {
            if !self.target_ids.contains(&shape.id) {
                continue;
            }
            let corners = shape.corner_points();
            if is_axis_aligned(shape.rect.angle) {
                let (min_x, min_y) = min_corner(&corners);
                let (max_x, max_y) = max_corner(&corners);
                push(&mut self.snaps, Snap::X { value: min_x });
                push(&mut self.snaps, Snap::X { value: max_x });
                push(&mut self.snaps, Snap::Y { value: min_y });
                push(&mut self.snaps, Snap::Y { value: max_y });
            } else if let Some(sel) = selected {
                // Rotated edges only help when the dragged shape shares
                // the same rotation class, otherwise corners suffice.
                if same_rotation_class(shape.rect.angle, sel.rect.angle) {
                    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
                        push(
                            &mut self.snaps,
                            Snap::Line {
                                p1: corners[a],
                                p2: corners[b],
                            },
                        );
                    }
                }
            }
            for corner in corners {
                push(&mut self.snaps, Snap::Point { p: corner });
            }
        }
    }
}

fn min_corner(corners: &[Point; 4]) -> (f64, f64) {
    let min_x = corners.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
    let min_y = corners.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
    (min_x, min_y)
}

fn max_corner(corners: &[Point; 4]) -> (f64, f64) {
    let max_x = corners
        .iter()
        .map(|c| c.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_y = corners
        .iter()
        .map(|c| c.y)
        .fold(f64::NEG_INFINITY, f64::max);
    (max_x, max_y)
}

fn circular_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

/// Fits in-progress rotations to angles already present on the canvas
/// and to the 45 degree grid.
#[derive(Debug, Default)]
pub struct AngleFit {
    candidates: Vec<f64>,
    fitted: Option<f64>,
}

impl AngleFit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect candidate angles at the start of a rotation drag. Every
    /// shape contributes its angle plus the three other quarter turns
    /// of it; the 45 degree grid is always included.
    pub fn begin(&mut self, store: &ShapeStore) {
        self.candidates.clear();
        self.fitted = None;
        for shape in store.shapes() {
            for quarter in 0..4 {
                self.candidates
                    .push(geometry::normalize_angle(shape.rect.angle + 90.0 * quarter as f64));
            }
        }
        for step in 0..8 {
            self.candidates.push(45.0 * step as f64);
        }
        self.candidates.sort_by(f64::total_cmp);
        self.candidates.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.fitted = None;
    }

    /// Fit an angle to the nearest candidate within the tolerance,
    /// remembering the fit for highlighting. Returns the input angle
    /// (normalized) when nothing is close enough.
    pub fn apply(&mut self, angle: f64) -> f64 {
        let normalized = geometry::normalize_angle(angle);
        let best = self
            .candidates
            .iter()
            .copied()
            .min_by(|a, b| circular_diff(*a, normalized).total_cmp(&circular_diff(*b, normalized)));
        match best {
            Some(candidate) if circular_diff(candidate, normalized) <= ANGLE_FIT_TOLERANCE => {
                self.fitted = Some(candidate);
                candidate
            }
            _ => {
                self.fitted = None;
                normalized
            }
        }
    }

    /// The candidate the last `apply` call landed on, if any.
    pub fn fitted(&self) -> Option<f64> {
        self.fitted
    }

    /// Shapes whose rotation matches the current fit, for highlighting.
    ///
    /// Quarter-turn fits highlight nothing; lining up with the world
    /// axes needs no callout.
    pub fn highlight_targets(&self, store: &ShapeStore) -> Vec<ShapeId> {
        let Some(fitted) = self.fitted else {
            return Vec::new();
        };
        if is_axis_aligned(fitted) {
            return Vec::new();
        }
        store
            .shapes()
            .iter()
            .filter(|s| !store.is_selected(s.id))
            .filter(|s| same_rotation_class(s.rect.angle, fitted))
            .map(|s| s.id)
            .collect()
    }
}
