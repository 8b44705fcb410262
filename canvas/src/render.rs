//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives read-only views of the shape list, selection, and camera and
//! produces pixels — it never mutates application state, so it is safe to
//! call on every state change.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`;
//! the host decides what to do with a broken context.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;
use crate::consts::{BACKGROUND_COLOR, HANDLE_RADIUS_PX, SELECTION_COLOR, SELECTION_DASH_PX};
use crate::geometry::{Bounds, ResizeHandle, bounding_box, text_bounds};
use crate::shape::{Arrow, Ellipse, Line, Pencil, Rect, Shape, Style, Text, TextAlign, TextBaseline, TRANSPARENT};

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Draw the full scene: background, committed shapes in z-order, selection
/// overlay, then the transient (in-progress) shape on top of everything.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device
/// pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    shapes: &[Shape],
    selected_id: Option<&str>,
    transient: Option<&Shape>,
    camera: &Camera,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.set_fill_style_str(BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: committed shapes, list order is z-order (bottom first).
    for shape in shapes {
        draw_shape(ctx, shape)?;
    }

    // Layer 3: selection overlay.
    if let Some(id) = selected_id
        && let Some(shape) = shapes.iter().find(|s| s.id() == id)
    {
        draw_selection(ctx, shape, camera.zoom)?;
    }

    // Layer 4: live preview of the in-progress gesture.
    if let Some(shape) = transient {
        draw_shape(ctx, shape)?;
    }

    Ok(())
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_global_alpha(shape.style().opacity);
    let result = match shape {
        Shape::Rect(r) => draw_rect(ctx, r),
        Shape::Ellipse(e) => draw_ellipse(ctx, e),
        Shape::Pencil(p) => {
            draw_pencil(ctx, p);
            Ok(())
        }
        Shape::Line(l) => {
            draw_line(ctx, l);
            Ok(())
        }
        Shape::Arrow(a) => {
            draw_arrow(ctx, a);
            Ok(())
        }
        Shape::Text(t) => draw_text(ctx, t),
    };
    ctx.restore();
    result
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_rect(ctx: &CanvasRenderingContext2d, r: &Rect) -> Result<(), JsValue> {
    // Live drags carry signed dimensions; normalize for path building.
    let b = bounding_box(&Shape::Rect(r.clone()));
    let radius = r.corner_radius.min(b.width / 2.0).min(b.height / 2.0);

    ctx.begin_path();
    if radius > 0.0 {
        ctx.round_rect_with_f64(b.x, b.y, b.width, b.height, radius)?;
    } else {
        ctx.rect(b.x, b.y, b.width, b.height);
    }
    apply_stroke_style(ctx, &r.style);
    ctx.stroke();
    fill_if_opaque(ctx, &r.style);
    Ok(())
}

fn draw_ellipse(ctx: &CanvasRenderingContext2d, e: &Ellipse) -> Result<(), JsValue> {
    let rx = e.radius_x.abs();
    let ry = e.radius_y.abs();
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(());
    }
    ctx.begin_path();
    ctx.ellipse(e.center_x, e.center_y, rx, ry, 0.0, 0.0, 2.0 * PI)?;
    apply_stroke_style(ctx, &e.style);
    ctx.stroke();
    fill_if_opaque(ctx, &e.style);
    Ok(())
}

fn draw_pencil(ctx: &CanvasRenderingContext2d, p: &Pencil) {
    let Some(first) = p.points.first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for point in &p.points[1..] {
        ctx.line_to(point.x, point.y);
    }
    apply_stroke_style(ctx, &p.style);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.stroke();
}

fn draw_line(ctx: &CanvasRenderingContext2d, l: &Line) {
    ctx.begin_path();
    ctx.move_to(l.x1, l.y1);
    ctx.line_to(l.x2, l.y2);
    apply_stroke_style(ctx, &l.style);
    ctx.stroke();
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, a: &Arrow) {
    ctx.begin_path();
    ctx.move_to(a.x1, a.y1);
    ctx.line_to(a.x2, a.y2);
    apply_stroke_style(ctx, &a.style);
    ctx.stroke();

    let angle = (a.y2 - a.y1).atan2(a.x2 - a.x1);
    draw_arrowhead(ctx, a.x2, a.y2, angle, a.arrowhead_size, &a.style.stroke_color);
}

fn draw_arrowhead(
    ctx: &CanvasRenderingContext2d,
    tip_x: f64,
    tip_y: f64,
    angle: f64,
    size: f64,
    color: &str,
) {
    let x1 = tip_x - size * (angle - ARROW_ANGLE).cos();
    let y1 = tip_y - size * (angle - ARROW_ANGLE).sin();
    let x2 = tip_x - size * (angle + ARROW_ANGLE).cos();
    let y2 = tip_y - size * (angle + ARROW_ANGLE).sin();

    ctx.begin_path();
    ctx.move_to(tip_x, tip_y);
    ctx.line_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.close_path();
    ctx.set_fill_style_str(color);
    ctx.fill();
}

fn draw_text(ctx: &CanvasRenderingContext2d, t: &Text) -> Result<(), JsValue> {
    if t.text.is_empty() {
        return Ok(());
    }
    ctx.set_fill_style_str(&t.color);
    ctx.set_font(&format!("{}px {}", t.font_size, t.font_family));
    ctx.set_text_align(match t.text_align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    });
    ctx.set_text_baseline(match t.text_baseline {
        TextBaseline::Top => "top",
        TextBaseline::Middle => "middle",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Bottom => "bottom",
    });
    ctx.fill_text(&t.text, t.x, t.y)?;
    Ok(())
}

// =============================================================
// Selection overlay
// =============================================================

fn draw_selection(ctx: &CanvasRenderingContext2d, shape: &Shape, zoom: f64) -> Result<(), JsValue> {
    let bounds = selection_bounds(ctx, shape);

    ctx.save();
    let dash_world = SELECTION_DASH_PX / zoom;
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash_world.into());
    dash_array.push(&dash_world.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.stroke_rect(bounds.x, bounds.y, bounds.width, bounds.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();

    // Corner handles exist only where resizing does.
    if !matches!(shape, Shape::Rect(_) | Shape::Ellipse(_)) {
        return Ok(());
    }

    let handle_world = HANDLE_RADIUS_PX / zoom;
    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    for handle in ResizeHandle::ALL {
        let pos = handle.position(&bounds);
        ctx.fill_rect(
            pos.x - handle_world,
            pos.y - handle_world,
            handle_world * 2.0,
            handle_world * 2.0,
        );
        ctx.stroke_rect(
            pos.x - handle_world,
            pos.y - handle_world,
            handle_world * 2.0,
            handle_world * 2.0,
        );
    }
    ctx.restore();
    Ok(())
}

/// Selection box for a shape. Text gets real glyph metrics from the context;
/// everything else shares [`bounding_box`] with hit-testing.
fn selection_bounds(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Bounds {
    match shape {
        Shape::Text(t) => measured_text_bounds(ctx, t),
        _ => bounding_box(shape),
    }
}

/// Text box from real glyph metrics, falling back to the shared heuristic
/// when measurement fails.
#[must_use]
pub fn measured_text_bounds(ctx: &CanvasRenderingContext2d, t: &Text) -> Bounds {
    ctx.save();
    ctx.set_font(&format!("{}px {}", t.font_size, t.font_family));
    let measured = ctx.measure_text(&t.text);
    ctx.restore();

    let Ok(metrics) = measured else {
        return text_bounds(t);
    };
    let width = metrics.width();
    let height = t.font_size;
    let x = match t.text_align {
        TextAlign::Left => t.x,
        TextAlign::Center => t.x - width / 2.0,
        TextAlign::Right => t.x - width,
    };
    let y = match t.text_baseline {
        TextBaseline::Top => t.y,
        TextBaseline::Middle => t.y - height / 2.0,
        TextBaseline::Alphabetic => t.y - height * 0.8,
        TextBaseline::Bottom => t.y - height,
    };
    Bounds { x, y, width, height }
}

/// Screen-space box for the host's text-input overlay: the shape's text
/// bounds pushed through the camera, with a minimum width so an empty shape
/// still gets a usable caret area.
#[must_use]
pub fn text_editor_box(t: &Text, camera: &Camera) -> Bounds {
    let world = text_bounds(t);
    let origin = camera.world_to_screen(crate::camera::Point::new(world.x, world.y));
    Bounds {
        x: origin.x,
        y: origin.y,
        width: (world.width * camera.zoom).max(t.font_size * camera.zoom),
        height: world.height * camera.zoom,
    }
}

// =============================================================
// Helpers
// =============================================================

fn apply_stroke_style(ctx: &CanvasRenderingContext2d, style: &Style) {
    ctx.set_stroke_style_str(&style.stroke_color);
    ctx.set_line_width(style.stroke_width);
}

fn fill_if_opaque(ctx: &CanvasRenderingContext2d, style: &Style) {
    if style.fill_color == TRANSPARENT {
        return;
    }
    ctx.set_fill_style_str(&style.fill_color);
    ctx.fill();
}
