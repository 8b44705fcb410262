//! Input vocabulary: tools, pointer events, and the gesture state carried
//! between pointer-down and pointer-up.
//!
//! The gesture owns any in-progress (transient) shape. It enters the
//! canonical shape list only at commit, which is what lets a cancelled
//! gesture vanish without cleanup.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::geometry::ResizeHandle;
use crate::shape::Shape;

/// The active tool, set by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Rect,
    Ellipse,
    Pencil,
    Line,
    Arrow,
    Eraser,
    Text,
}

impl Tool {
    /// Tools whose gesture produces a brand-new shape from a drag.
    #[must_use]
    pub fn draws_shape(self) -> bool {
        matches!(self, Self::Rect | Self::Ellipse | Self::Pencil | Self::Line | Self::Arrow)
    }
}

/// One pointer event in world coordinates. The host converts from screen
/// space through the camera before calling in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// Pointer left the surface; treated as an implicit `Up` at the last
    /// known position so no gesture is left dangling.
    Leave,
}

impl PointerEvent {
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self { kind: PointerEventKind::Down, x, y }
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self { kind: PointerEventKind::Move, x, y }
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self { kind: PointerEventKind::Up, x, y }
    }
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging out a new shape. The shape lives here, not in the list,
    /// until commit.
    Drawing { anchor: Point, shape: Shape },
    /// Dragging a selected shape; `last` is the previous pointer position
    /// so each move applies a pure delta.
    Moving { id: String, last: Point },
    /// Dragging a corner handle of the selected shape. `start` is the shape
    /// as it was when the handle was grabbed; each move resizes relative to
    /// that snapshot, so the anchor corner stays fixed for the whole drag.
    Resizing { id: String, handle: ResizeHandle, start: Shape },
    /// Paint-to-delete stroke in progress.
    Erasing,
    /// A text shape is open in the host's text-input surface.
    EditingText { id: String },
}

impl Gesture {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The in-progress shape rendered on top of the committed list, if any.
    #[must_use]
    pub fn transient_shape(&self) -> Option<&Shape> {
        match self {
            Self::Drawing { shape, .. } => Some(shape),
            _ => None,
        }
    }
}
