//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Half-size of the square hit zone around each resize handle, in pixels.
pub const HANDLE_HIT_PX: f64 = 8.0;

/// Extra slop added to `stroke_width / 2` when hit-testing strokes.
pub const STROKE_HIT_TOLERANCE: f64 = 5.0;

/// Minimum padding around polyline/line bounding boxes, in world units.
pub const LINE_BOUNDS_PAD: f64 = 4.0;

// ── Gesture commit thresholds ───────────────────────────────────

/// Minimum absolute size per axis for a committed rect, and the floor
/// enforced while resizing.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Minimum radius per axis for a committed or resized ellipse.
pub const MIN_RADIUS: f64 = 2.5;

// ── Text metrics heuristic ──────────────────────────────────────

/// Approximate advance width of one glyph as a fraction of the font size.
/// Used where no 2D context is available to measure real metrics.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

// ── Rendering ───────────────────────────────────────────────────

/// Selection dash segment length in screen pixels.
pub const SELECTION_DASH_PX: f64 = 4.0;

/// Half-size of a drawn resize handle square, in screen pixels.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Canvas background fill.
pub const BACKGROUND_COLOR: &str = "#000000";

/// Selection overlay stroke color.
pub const SELECTION_COLOR: &str = "#1E90FF";
