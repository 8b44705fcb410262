//! Pure geometry: bounding boxes, containment tests, and resize math.
//!
//! Everything here operates in world coordinates and touches no browser API,
//! so the whole module is unit-testable natively. Text boxes use a glyph
//! advance heuristic ([`crate::consts::TEXT_WIDTH_FACTOR`]); the renderer
//! substitutes real metrics where a 2D context is available, but selection
//! and hit-testing deliberately share this single approximation so they
//! agree with each other.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;
use crate::consts::{
    HANDLE_HIT_PX, LINE_BOUNDS_PAD, MIN_RADIUS, MIN_SHAPE_SIZE, STROKE_HIT_TOLERANCE,
    TEXT_WIDTH_FACTOR,
};
use crate::shape::{Ellipse, Rect, Shape, Text};

/// Axis-aligned bounding box with non-negative dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// One of the four corner resize handles. Only rect and ellipse expose
/// handles; pencil strokes and text are move-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    /// Handle position on a bounding box.
    #[must_use]
    pub fn position(self, b: &Bounds) -> Point {
        match self {
            Self::TopLeft => Point::new(b.x, b.y),
            Self::TopRight => Point::new(b.x + b.width, b.y),
            Self::BottomLeft => Point::new(b.x, b.y + b.height),
            Self::BottomRight => Point::new(b.x + b.width, b.y + b.height),
        }
    }

    /// The diagonally opposite corner, which stays fixed during a resize.
    #[must_use]
    pub fn anchor(self, b: &Bounds) -> Point {
        match self {
            Self::TopLeft => Self::BottomRight.position(b),
            Self::TopRight => Self::BottomLeft.position(b),
            Self::BottomLeft => Self::TopRight.position(b),
            Self::BottomRight => Self::TopLeft.position(b),
        }
    }
}

// ===== BOUNDING BOXES =====

/// Bounding box of a shape, normalized to non-negative dimensions.
#[must_use]
pub fn bounding_box(shape: &Shape) -> Bounds {
    match shape {
        Shape::Rect(r) => {
            let (x, width) = if r.width < 0.0 { (r.x + r.width, -r.width) } else { (r.x, r.width) };
            let (y, height) =
                if r.height < 0.0 { (r.y + r.height, -r.height) } else { (r.y, r.height) };
            Bounds { x, y, width, height }
        }
        Shape::Ellipse(e) => {
            let rx = e.radius_x.abs();
            let ry = e.radius_y.abs();
            Bounds { x: e.center_x - rx, y: e.center_y - ry, width: 2.0 * rx, height: 2.0 * ry }
        }
        Shape::Pencil(p) => {
            let pad = stroke_pad(shape);
            points_bounds(&p.points, pad)
        }
        Shape::Line(l) => {
            let pad = stroke_pad(shape);
            points_bounds(&[Point::new(l.x1, l.y1), Point::new(l.x2, l.y2)], pad)
        }
        Shape::Arrow(a) => {
            let pad = stroke_pad(shape);
            points_bounds(&[Point::new(a.x1, a.y1), Point::new(a.x2, a.y2)], pad)
        }
        Shape::Text(t) => text_bounds(t),
    }
}

fn stroke_pad(shape: &Shape) -> f64 {
    LINE_BOUNDS_PAD.max(shape.style().stroke_width / 2.0)
}

fn points_bounds(points: &[Point], pad: f64) -> Bounds {
    let Some(first) = points.first() else {
        return Bounds { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
    };
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Bounds {
        x: min_x - pad,
        y: min_y - pad,
        width: (max_x - min_x) + 2.0 * pad,
        height: (max_y - min_y) + 2.0 * pad,
    }
}

/// Heuristic text box: one line, fixed per-glyph advance, anchored by the
/// shape's align/baseline settings.
#[must_use]
pub fn text_bounds(t: &Text) -> Bounds {
    let chars = t.text.chars().count();
    #[allow(clippy::cast_precision_loss)]
    let width = chars as f64 * t.font_size * TEXT_WIDTH_FACTOR;
    let height = t.font_size;
    let x = match t.text_align {
        crate::shape::TextAlign::Left => t.x,
        crate::shape::TextAlign::Center => t.x - width / 2.0,
        crate::shape::TextAlign::Right => t.x - width,
    };
    let y = match t.text_baseline {
        crate::shape::TextBaseline::Top => t.y,
        crate::shape::TextBaseline::Middle => t.y - height / 2.0,
        crate::shape::TextBaseline::Alphabetic => t.y - height * 0.8,
        crate::shape::TextBaseline::Bottom => t.y - height,
    };
    Bounds { x, y, width, height }
}

// ===== CONTAINMENT =====

/// Distance from a point to the segment `a..b`.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        // Degenerate segment, both endpoints coincide.
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * abx;
    let cy = a.y + t * aby;
    (p.x - cx).hypot(p.y - cy)
}

fn near_polyline(p: Point, points: &[Point], stroke_width: f64) -> bool {
    let tolerance = stroke_width / 2.0 + STROKE_HIT_TOLERANCE;
    points
        .windows(2)
        .any(|pair| point_to_segment_distance(p, pair[0], pair[1]) <= tolerance)
}

/// Whether a world point hits a shape's interactive area.
#[must_use]
pub fn point_in_shape(x: f64, y: f64, shape: &Shape) -> bool {
    let p = Point::new(x, y);
    match shape {
        Shape::Rect(_) => bounding_box(shape).contains(x, y),
        Shape::Ellipse(e) => point_in_ellipse(p, e),
        Shape::Pencil(s) => {
            if s.points.len() == 1 {
                // A single dot has no segments; test the point itself.
                return near_polyline(p, &[s.points[0], s.points[0]], s.style.stroke_width);
            }
            near_polyline(p, &s.points, s.style.stroke_width)
        }
        Shape::Line(l) => near_polyline(
            p,
            &[Point::new(l.x1, l.y1), Point::new(l.x2, l.y2)],
            l.style.stroke_width,
        ),
        Shape::Arrow(a) => near_polyline(
            p,
            &[Point::new(a.x1, a.y1), Point::new(a.x2, a.y2)],
            a.style.stroke_width,
        ),
        Shape::Text(t) => text_bounds(t).contains(x, y),
    }
}

fn point_in_ellipse(p: Point, e: &Ellipse) -> bool {
    let rx = e.radius_x.abs();
    let ry = e.radius_y.abs();
    let dx = p.x - e.center_x;
    let dy = p.y - e.center_y;
    // A zero radius collapses that axis to a line; fall back to a strip
    // test rather than dividing by zero.
    if rx == 0.0 {
        return dx.abs() <= STROKE_HIT_TOLERANCE && dy.abs() <= ry;
    }
    if ry == 0.0 {
        return dy.abs() <= STROKE_HIT_TOLERANCE && dx.abs() <= rx;
    }
    let nx = dx / rx;
    let ny = dy / ry;
    nx * nx + ny * ny <= 1.0
}

/// Topmost shape under a world point, or `None`. List order is z-order,
/// so the scan runs back-to-front.
#[must_use]
pub fn find_shape_at(x: f64, y: f64, shapes: &[Shape]) -> Option<&Shape> {
    shapes.iter().rev().find(|s| point_in_shape(x, y, s))
}

/// Which resize handle of `shape` (if any) lies under a world point.
/// Handles exist only for rect and ellipse.
#[must_use]
pub fn resize_handle_at(x: f64, y: f64, shape: &Shape) -> Option<ResizeHandle> {
    if !matches!(shape, Shape::Rect(_) | Shape::Ellipse(_)) {
        return None;
    }
    let bounds = bounding_box(shape);
    ResizeHandle::ALL.into_iter().find(|handle| {
        let pos = handle.position(&bounds);
        (x - pos.x).abs() <= HANDLE_HIT_PX && (y - pos.y).abs() <= HANDLE_HIT_PX
    })
}

// ===== RESIZE MATH =====

/// Recompute a rect from a corner drag. `start` is the rect as it was when
/// the handle was grabbed; the corner opposite `handle` in `start`'s box is
/// the anchor for the whole gesture, so the anchor cannot drift even when
/// the pointer crosses it and the box flips. Width/height are the signed
/// anchor→pointer span, floored at [`MIN_SHAPE_SIZE`] per axis.
/// `cornerRadius` scales from `start`'s radius with the smaller of the two
/// axis scale factors so rounding stays visually consistent under
/// non-uniform resize and never compounds across moves.
pub fn resize_rect(r: &mut Rect, start: &Rect, handle: ResizeHandle, pointer: Point) {
    let before = bounding_box(&Shape::Rect(start.clone()));
    let anchor = handle.anchor(&before);

    let width = floor_span(pointer.x - anchor.x, MIN_SHAPE_SIZE);
    let height = floor_span(pointer.y - anchor.y, MIN_SHAPE_SIZE);

    let (x, w) = if width < 0.0 { (anchor.x + width, -width) } else { (anchor.x, width) };
    let (y, h) = if height < 0.0 { (anchor.y + height, -height) } else { (anchor.y, height) };

    if start.corner_radius > 0.0 && before.width > 0.0 && before.height > 0.0 {
        let scale = (w / before.width).min(h / before.height);
        r.corner_radius = start.corner_radius * scale;
    }
    r.x = x;
    r.y = y;
    r.width = w;
    r.height = h;
}

/// Recompute an ellipse from a corner drag: new center and radii span the
/// box between the anchor corner of `start`'s bounding box (fixed for the
/// whole gesture) and the pointer, with radii floored at [`MIN_RADIUS`].
/// The floor extends the span away from the anchor so the anchor corner
/// itself never moves.
pub fn resize_ellipse(e: &mut Ellipse, start: &Ellipse, handle: ResizeHandle, pointer: Point) {
    let before = bounding_box(&Shape::Ellipse(start.clone()));
    let anchor = handle.anchor(&before);

    let span_x = floor_span(pointer.x - anchor.x, 2.0 * MIN_RADIUS);
    let span_y = floor_span(pointer.y - anchor.y, 2.0 * MIN_RADIUS);

    e.center_x = anchor.x + span_x / 2.0;
    e.center_y = anchor.y + span_y / 2.0;
    e.radius_x = span_x.abs() / 2.0;
    e.radius_y = span_y.abs() / 2.0;
}

fn floor_span(span: f64, min: f64) -> f64 {
    if span.abs() < min {
        if span < 0.0 { -min } else { min }
    } else {
        span
    }
}
