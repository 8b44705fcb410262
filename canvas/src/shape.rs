//! Shape model: the tagged union of drawable primitives and their style.
//!
//! Field names follow the wire protocol (camelCase), so a shape serialized
//! here is byte-compatible with what peers and the history store expect.
//! Numbers are IEEE-754 doubles end to end; nothing is rounded.
//!
//! A shape's `id` is assigned once at gesture start and never changes; it is
//! the sole key used to locate, update, or delete the shape both locally and
//! across the wire.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;

/// Sentinel fill value meaning "no fill".
pub const TRANSPARENT: &str = "transparent";

/// Stroke/fill style shared by every shape variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(rename = "strokeColor")]
    pub stroke_color: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
    /// Hex color, or [`TRANSPARENT`].
    #[serde(rename = "fillColor")]
    pub fill_color: String,
    /// 0.0 (invisible) ..= 1.0 (opaque).
    pub opacity: f64,
}

/// Horizontal anchor for text shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor for text shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

/// Axis-aligned rectangle. `x`/`y` is a corner; `width`/`height` may be
/// negative during a live drag and are normalized at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub id: String,
    #[serde(flatten)]
    pub style: Style,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "cornerRadius")]
    pub corner_radius: f64,
}

/// Ellipse described by center and per-axis radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub id: String,
    #[serde(flatten)]
    pub style: Style,
    #[serde(rename = "centerX")]
    pub center_x: f64,
    #[serde(rename = "centerY")]
    pub center_y: f64,
    #[serde(rename = "radiusX")]
    pub radius_x: f64,
    #[serde(rename = "radiusY")]
    pub radius_y: f64,
}

/// Freehand polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pencil {
    pub id: String,
    #[serde(flatten)]
    pub style: Style,
    pub points: Vec<Point>,
}

/// Straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    #[serde(flatten)]
    pub style: Style,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Directed arrow: a line with an arrowhead at `(x2, y2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub id: String,
    #[serde(flatten)]
    pub style: Style,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "arrowheadSize")]
    pub arrowhead_size: f64,
}

/// Text anchored at `(x, y)`; the rendered box is derived from glyph
/// metrics plus the align/baseline anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: String,
    #[serde(flatten)]
    pub style: Style,
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    pub color: String,
    #[serde(rename = "textAlign")]
    pub text_align: TextAlign,
    #[serde(rename = "textBaseline")]
    pub text_baseline: TextBaseline,
}

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect(Rect),
    Ellipse(Ellipse),
    Pencil(Pencil),
    Line(Line),
    Arrow(Arrow),
    Text(Text),
}

/// Process-wide drawing style, set by the style panel.
///
/// New shapes capture a snapshot of this value at gesture start; mutating it
/// afterwards does not retroactively change existing shapes, except the one
/// currently selected, which is live-patched by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingProperties {
    #[serde(rename = "strokeColor")]
    pub stroke_color: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
    #[serde(rename = "fillColor")]
    pub fill_color: String,
    pub opacity: f64,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
}

impl Default for DrawingProperties {
    fn default() -> Self {
        Self {
            stroke_color: "#ffffff".into(),
            stroke_width: 2.0,
            fill_color: TRANSPARENT.into(),
            opacity: 1.0,
            font_size: 20.0,
            font_family: "sans-serif".into(),
        }
    }
}

impl DrawingProperties {
    /// Snapshot the stroke/fill subset as a shape [`Style`].
    #[must_use]
    pub fn style(&self) -> Style {
        Style {
            stroke_color: self.stroke_color.clone(),
            stroke_width: self.stroke_width,
            fill_color: self.fill_color.clone(),
            opacity: self.opacity,
        }
    }
}

/// Allocate a fresh globally-unique shape id.
#[must_use]
pub fn new_shape_id() -> String {
    Uuid::new_v4().to_string()
}

impl Shape {
    // ── Constructors (one per tool gesture) ─────────────────────

    #[must_use]
    pub fn rect(id: String, props: &DrawingProperties, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect(Rect { id, style: props.style(), x, y, width, height, corner_radius: 0.0 })
    }

    #[must_use]
    pub fn ellipse(
        id: String,
        props: &DrawingProperties,
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
    ) -> Self {
        Self::Ellipse(Ellipse { id, style: props.style(), center_x, center_y, radius_x, radius_y })
    }

    #[must_use]
    pub fn pencil(id: String, props: &DrawingProperties, start: Point) -> Self {
        Self::Pencil(Pencil { id, style: props.style(), points: vec![start] })
    }

    #[must_use]
    pub fn line(id: String, props: &DrawingProperties, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Line(Line { id, style: props.style(), x1, y1, x2, y2 })
    }

    #[must_use]
    pub fn arrow(id: String, props: &DrawingProperties, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Arrow(Arrow {
            id,
            style: props.style(),
            x1,
            y1,
            x2,
            y2,
            arrowhead_size: 10.0,
        })
    }

    #[must_use]
    pub fn text(id: String, props: &DrawingProperties, x: f64, y: f64) -> Self {
        Self::Text(Text {
            id,
            style: props.style(),
            x,
            y,
            text: String::new(),
            font_size: props.font_size,
            font_family: props.font_family.clone(),
            color: props.stroke_color.clone(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
        })
    }

    // ── Accessors ───────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Rect(s) => &s.id,
            Self::Ellipse(s) => &s.id,
            Self::Pencil(s) => &s.id,
            Self::Line(s) => &s.id,
            Self::Arrow(s) => &s.id,
            Self::Text(s) => &s.id,
        }
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        match self {
            Self::Rect(s) => &s.style,
            Self::Ellipse(s) => &s.style,
            Self::Pencil(s) => &s.style,
            Self::Line(s) => &s.style,
            Self::Arrow(s) => &s.style,
            Self::Text(s) => &s.style,
        }
    }

    // ── Mutation helpers ────────────────────────────────────────

    /// Move the shape by a delta. Touches only position-bearing fields;
    /// style is untouched.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rect(s) => {
                s.x += dx;
                s.y += dy;
            }
            Self::Ellipse(s) => {
                s.center_x += dx;
                s.center_y += dy;
            }
            Self::Pencil(s) => {
                for p in &mut s.points {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Self::Line(s) => {
                s.x1 += dx;
                s.y1 += dy;
                s.x2 += dx;
                s.y2 += dy;
            }
            Self::Arrow(s) => {
                s.x1 += dx;
                s.y1 += dy;
                s.x2 += dx;
                s.y2 += dy;
            }
            Self::Text(s) => {
                s.x += dx;
                s.y += dy;
            }
        }
    }

    /// Live-patch the style fields from the current drawing properties.
    /// Used for the selected/actively-edited shape only.
    pub fn apply_style(&mut self, props: &DrawingProperties) {
        let style = match self {
            Self::Rect(s) => &mut s.style,
            Self::Ellipse(s) => &mut s.style,
            Self::Pencil(s) => &mut s.style,
            Self::Line(s) => &mut s.style,
            Self::Arrow(s) => &mut s.style,
            Self::Text(s) => {
                s.font_size = props.font_size;
                s.font_family = props.font_family.clone();
                s.color = props.stroke_color.clone();
                &mut s.style
            }
        };
        *style = props.style();
    }

    /// Normalize signed drag geometry into canonical form: positive
    /// width/height for rects, non-negative radii for ellipses. Other
    /// variants are already canonical.
    pub fn normalize(&mut self) {
        match self {
            Self::Rect(s) => {
                if s.width < 0.0 {
                    s.x += s.width;
                    s.width = -s.width;
                }
                if s.height < 0.0 {
                    s.y += s.height;
                    s.height = -s.height;
                }
            }
            Self::Ellipse(s) => {
                s.radius_x = s.radius_x.abs();
                s.radius_y = s.radius_y.abs();
            }
            Self::Pencil(_) | Self::Line(_) | Self::Arrow(_) | Self::Text(_) => {}
        }
    }

    /// Serialize to the wire-transmissible JSON string.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error; cannot occur for shapes built
    /// through this module.
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a wire payload. Returns `None` for payloads missing
    /// required fields for their declared type, or with an unknown type —
    /// malformed peer messages are dropped, never surfaced.
    #[must_use]
    pub fn from_wire(payload: &str) -> Option<Self> {
        match serde_json::from_str(payload) {
            Ok(shape) => Some(shape),
            Err(_) => None,
        }
    }
}
