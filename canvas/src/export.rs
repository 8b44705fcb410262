//! SVG export: one markup fragment per shape, style attributes mapped 1:1.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::geometry::bounding_box;
use crate::shape::{Shape, Style, TextAlign};

/// SVG fragment for the selected shape, or `None` when nothing is selected
/// (or the selection no longer resolves).
#[must_use]
pub fn selected_shape_svg(shapes: &[Shape], selected_id: Option<&str>) -> Option<String> {
    let id = selected_id?;
    let shape = shapes.iter().find(|s| s.id() == id)?;
    Some(shape_svg(shape))
}

/// SVG fragment for one shape.
#[must_use]
pub fn shape_svg(shape: &Shape) -> String {
    match shape {
        Shape::Rect(r) => {
            let b = bounding_box(shape);
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" {} />"#,
                b.x,
                b.y,
                b.width,
                b.height,
                r.corner_radius,
                style_attrs(&r.style),
            )
        }
        Shape::Ellipse(e) => format!(
            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" {} />"#,
            e.center_x,
            e.center_y,
            e.radius_x.abs(),
            e.radius_y.abs(),
            style_attrs(&e.style),
        ),
        Shape::Pencil(p) => {
            let mut d = String::new();
            for (i, point) in p.points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                d.push_str(&format!("{cmd}{} {} ", point.x, point.y));
            }
            format!(
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{}" stroke-linecap="round" stroke-linejoin="round" />"#,
                d.trim_end(),
                p.style.stroke_color,
                p.style.stroke_width,
                p.style.opacity,
            )
        }
        Shape::Line(l) => format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}" />"#,
            l.x1, l.y1, l.x2, l.y2, l.style.stroke_color, l.style.stroke_width, l.style.opacity,
        ),
        Shape::Arrow(a) => {
            let head = arrowhead_points(a.x1, a.y1, a.x2, a.y2, a.arrowhead_size);
            format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}" /><polygon points="{}" fill="{}" opacity="{}" />"#,
                a.x1,
                a.y1,
                a.x2,
                a.y2,
                a.style.stroke_color,
                a.style.stroke_width,
                a.style.opacity,
                head,
                a.style.stroke_color,
                a.style.opacity,
            )
        }
        Shape::Text(t) => {
            let anchor = match t.text_align {
                TextAlign::Left => "start",
                TextAlign::Center => "middle",
                TextAlign::Right => "end",
            };
            format!(
                r#"<text x="{}" y="{}" font-size="{}" font-family="{}" fill="{}" opacity="{}" text-anchor="{anchor}">{}</text>"#,
                t.x,
                t.y,
                t.font_size,
                t.font_family,
                t.color,
                t.style.opacity,
                escape_text(&t.text),
            )
        }
    }
}

fn style_attrs(style: &Style) -> String {
    format!(
        r#"stroke="{}" stroke-width="{}" fill="{}" opacity="{}""#,
        style.stroke_color, style.stroke_width, style.fill_color, style.opacity,
    )
}

fn arrowhead_points(x1: f64, y1: f64, x2: f64, y2: f64, size: f64) -> String {
    let angle = (y2 - y1).atan2(x2 - x1);
    let spread = std::f64::consts::PI / 6.0;
    let ax = x2 - size * (angle - spread).cos();
    let ay = y2 - size * (angle - spread).sin();
    let bx = x2 - size * (angle + spread).cos();
    let by = y2 - size * (angle + spread).sin();
    format!("{x2},{y2} {ax},{ay} {bx},{by}")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
