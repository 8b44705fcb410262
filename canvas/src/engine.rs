//! Interaction state machine.
//!
//! [`EngineCore`] owns the room's canonical shape list (list order is
//! z-order), the selection, the active tool, and the in-progress gesture.
//! Every input — pointer events, tool/property changes, text keystrokes —
//! funnels through one entry point and returns the [`Action`]s the host
//! must perform: broadcast a message, re-render, open the text editor.
//!
//! Remote edits come back through the `apply_*` methods. Both local input
//! and remote application run on the same single-threaded event loop, so
//! there is no locking here; a multithreaded host must serialize calls
//! itself.
//!
//! Selection is stored as an id, never as a copy of the shape: every
//! operation on "the selected shape" re-resolves it from the list first,
//! so a concurrent remote erase simply makes the operation a no-op.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::Point;
use crate::consts::{MIN_RADIUS, MIN_SHAPE_SIZE};
use crate::geometry::{find_shape_at, point_in_shape, resize_ellipse, resize_handle_at, resize_rect};
use crate::input::{Gesture, PointerEvent, PointerEventKind, Tool};
use crate::shape::{DrawingProperties, Shape, new_shape_id};

/// Side effect requested by the engine. The host executes these in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Broadcast an authoritative, to-be-persisted shape.
    Commit(Shape),
    /// Broadcast a live-preview frame of an uncommitted shape.
    Streaming(Shape),
    /// Broadcast an in-place mutation of a committed shape.
    Update(Shape),
    /// Broadcast deletion of a shape. Carries the full shape so the wire
    /// payload stays symmetric with the other kinds.
    Erase(Shape),
    /// Broadcast room-wide deletion.
    Clear,
    /// The scene changed; redraw now.
    RenderNeeded,
    /// Open the host's text-input surface over the given text shape.
    OpenTextEditor { id: String },
}

/// The drawing engine: shape list + selection + tool + gesture.
#[derive(Debug, Default)]
pub struct EngineCore {
    shapes: Vec<Shape>,
    selected: Option<String>,
    tool: Tool,
    gesture: Gesture,
    props: DrawingProperties,
    last_pointer: Option<Point>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ───────────────────────────────────────────────

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn properties(&self) -> &DrawingProperties {
        &self.props
    }

    /// In-progress shape to draw on top of the list, if a draw gesture is
    /// active.
    #[must_use]
    pub fn transient_shape(&self) -> Option<&Shape> {
        self.gesture.transient_shape()
    }

    fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    fn shape_by_id(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    // ── Pointer input ───────────────────────────────────────────

    /// Single entry point for pointer input, in world coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Action> {
        let p = Point::new(event.x, event.y);
        match event.kind {
            PointerEventKind::Down => {
                self.last_pointer = Some(p);
                self.pointer_down(p)
            }
            PointerEventKind::Move => {
                self.last_pointer = Some(p);
                self.pointer_move(p)
            }
            PointerEventKind::Up => {
                self.last_pointer = Some(p);
                self.pointer_up(p)
            }
            // Finalize at the last known position so no gesture dangles.
            PointerEventKind::Leave => match self.last_pointer {
                Some(last) => self.pointer_up(last),
                None => Vec::new(),
            },
        }
    }

    fn pointer_down(&mut self, p: Point) -> Vec<Action> {
        // A click anywhere while editing text commits the edit first
        // (losing focus ends editing).
        let mut actions = if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.commit_text()
        } else {
            Vec::new()
        };

        match self.tool {
            Tool::Select => actions.extend(self.select_down(p)),
            Tool::Rect => {
                let shape = Shape::rect(new_shape_id(), &self.props, p.x, p.y, 0.0, 0.0);
                self.gesture = Gesture::Drawing { anchor: p, shape };
                actions.push(Action::RenderNeeded);
            }
            Tool::Ellipse => {
                let shape = Shape::ellipse(new_shape_id(), &self.props, p.x, p.y, 0.0, 0.0);
                self.gesture = Gesture::Drawing { anchor: p, shape };
                actions.push(Action::RenderNeeded);
            }
            Tool::Line => {
                let shape = Shape::line(new_shape_id(), &self.props, p.x, p.y, p.x, p.y);
                self.gesture = Gesture::Drawing { anchor: p, shape };
                actions.push(Action::RenderNeeded);
            }
            Tool::Arrow => {
                let shape = Shape::arrow(new_shape_id(), &self.props, p.x, p.y, p.x, p.y);
                self.gesture = Gesture::Drawing { anchor: p, shape };
                actions.push(Action::RenderNeeded);
            }
            Tool::Pencil => {
                let shape = Shape::pencil(new_shape_id(), &self.props, p);
                self.gesture = Gesture::Drawing { anchor: p, shape };
                actions.push(Action::RenderNeeded);
            }
            Tool::Eraser => {
                self.gesture = Gesture::Erasing;
                actions.extend(self.erase_at(p));
            }
            Tool::Text => {
                let id = new_shape_id();
                let shape = Shape::text(id.clone(), &self.props, p.x, p.y);
                self.shapes.push(shape);
                self.selected = Some(id.clone());
                self.gesture = Gesture::EditingText { id: id.clone() };
                actions.push(Action::OpenTextEditor { id });
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    fn select_down(&mut self, p: Point) -> Vec<Action> {
        // Handle check runs against the currently selected shape only.
        if let Some(id) = self.selected.clone()
            && let Some(shape) = self.shape_by_id(&id)
            && let Some(handle) = resize_handle_at(p.x, p.y, shape)
        {
            let start = shape.clone();
            self.gesture = Gesture::Resizing { id, handle, start };
            return vec![Action::RenderNeeded];
        }
        if let Some(shape) = find_shape_at(p.x, p.y, &self.shapes) {
            let id = shape.id().to_owned();
            self.selected = Some(id.clone());
            self.gesture = Gesture::Moving { id, last: p };
        } else {
            self.selected = None;
            self.gesture = Gesture::Idle;
        }
        vec![Action::RenderNeeded]
    }

    fn pointer_move(&mut self, p: Point) -> Vec<Action> {
        match &mut self.gesture {
            Gesture::Drawing { anchor, shape } => {
                let anchor = *anchor;
                match shape {
                    Shape::Rect(r) => {
                        r.width = p.x - anchor.x;
                        r.height = p.y - anchor.y;
                    }
                    Shape::Ellipse(e) => {
                        e.center_x = (anchor.x + p.x) / 2.0;
                        e.center_y = (anchor.y + p.y) / 2.0;
                        e.radius_x = (p.x - anchor.x).abs() / 2.0;
                        e.radius_y = (p.y - anchor.y).abs() / 2.0;
                    }
                    Shape::Line(l) => {
                        l.x2 = p.x;
                        l.y2 = p.y;
                    }
                    Shape::Arrow(a) => {
                        a.x2 = p.x;
                        a.y2 = p.y;
                    }
                    Shape::Pencil(s) => s.points.push(p),
                    Shape::Text(_) => {}
                }
                vec![Action::Streaming(shape.clone()), Action::RenderNeeded]
            }
            Gesture::Moving { id, last } => {
                let id = id.clone();
                let delta = Point::new(p.x - last.x, p.y - last.y);
                *last = p;
                match self.shape_mut(&id) {
                    Some(shape) => {
                        shape.translate(delta.x, delta.y);
                        let updated = shape.clone();
                        vec![Action::Update(updated), Action::RenderNeeded]
                    }
                    // Erased under us by a peer; the gesture dies with it.
                    None => {
                        self.gesture = Gesture::Idle;
                        self.selected = None;
                        vec![Action::RenderNeeded]
                    }
                }
            }
            Gesture::Resizing { id, handle, start } => {
                let id = id.clone();
                let handle = *handle;
                let start = start.clone();
                match self.shape_mut(&id) {
                    Some(shape) => {
                        match (&mut *shape, &start) {
                            (Shape::Rect(r), Shape::Rect(s)) => resize_rect(r, s, handle, p),
                            (Shape::Ellipse(e), Shape::Ellipse(s)) => {
                                resize_ellipse(e, s, handle, p);
                            }
                            _ => {}
                        }
                        let updated = shape.clone();
                        vec![Action::Update(updated), Action::RenderNeeded]
                    }
                    None => {
                        self.gesture = Gesture::Idle;
                        self.selected = None;
                        vec![Action::RenderNeeded]
                    }
                }
            }
            Gesture::Erasing => self.erase_at(p),
            Gesture::Idle | Gesture::EditingText { .. } => Vec::new(),
        }
    }

    fn pointer_up(&mut self, _p: Point) -> Vec<Action> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Drawing { shape, .. } => self.finish_drawing(shape),
            Gesture::Moving { id, .. } | Gesture::Resizing { id, .. } => {
                // One final authoritative update so peers end on the exact
                // final geometry even if mid-drag frames were dropped.
                match self.shape_by_id(&id) {
                    Some(shape) => {
                        let shape = shape.clone();
                        vec![Action::Update(shape), Action::RenderNeeded]
                    }
                    None => vec![Action::RenderNeeded],
                }
            }
            Gesture::Erasing => Vec::new(),
            gesture @ Gesture::EditingText { .. } => {
                // Editing ends on focus loss or commit key, not pointer-up.
                self.gesture = gesture;
                Vec::new()
            }
            Gesture::Idle => Vec::new(),
        }
    }

    fn finish_drawing(&mut self, mut shape: Shape) -> Vec<Action> {
        shape.normalize();
        if Self::is_degenerate(&shape) {
            // Clear the transient preview, commit nothing.
            return vec![Action::RenderNeeded];
        }
        self.shapes.push(shape.clone());
        vec![Action::Commit(shape), Action::RenderNeeded]
    }

    fn is_degenerate(shape: &Shape) -> bool {
        match shape {
            Shape::Rect(r) => r.width < MIN_SHAPE_SIZE || r.height < MIN_SHAPE_SIZE,
            Shape::Ellipse(e) => e.radius_x < MIN_RADIUS || e.radius_y < MIN_RADIUS,
            Shape::Pencil(p) => p.points.len() < 2,
            Shape::Line(l) => (l.x2 - l.x1).hypot(l.y2 - l.y1) < MIN_SHAPE_SIZE,
            Shape::Arrow(a) => (a.x2 - a.x1).hypot(a.y2 - a.y1) < MIN_SHAPE_SIZE,
            Shape::Text(t) => t.text.is_empty(),
        }
    }

    /// Remove every shape under the point, emitting an erase per shape.
    fn erase_at(&mut self, p: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut i = 0;
        while i < self.shapes.len() {
            if point_in_shape(p.x, p.y, &self.shapes[i]) {
                let removed = self.shapes.remove(i);
                if self.selected.as_deref() == Some(removed.id()) {
                    self.selected = None;
                }
                actions.push(Action::Erase(removed));
            } else {
                i += 1;
            }
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // ── Tool / property commands ────────────────────────────────

    /// Switch tools. Any in-progress draw gesture is discarded, not
    /// committed; an open text edit is committed first.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.commit_text()
        } else {
            Vec::new()
        };
        self.gesture = Gesture::Idle;
        if tool != Tool::Select {
            self.selected = None;
        }
        self.tool = tool;
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Update the process-wide drawing properties. The selected shape (and
    /// only it) is live-patched, and the patch is broadcast immediately.
    pub fn set_properties(&mut self, props: DrawingProperties) -> Vec<Action> {
        self.props = props;
        let Some(id) = self.selected.clone() else {
            return Vec::new();
        };
        let props = self.props.clone();
        match self.shape_mut(&id) {
            Some(shape) => {
                shape.apply_style(&props);
                let updated = shape.clone();
                vec![Action::Update(updated), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    // ── Text editing ────────────────────────────────────────────

    /// Replace the text of the shape being edited. Called per keystroke by
    /// the host's text-input surface.
    pub fn text_input(&mut self, text: &str) -> Vec<Action> {
        let Gesture::EditingText { id } = &self.gesture else {
            return Vec::new();
        };
        let id = id.clone();
        match self.shape_mut(&id) {
            Some(Shape::Text(t)) => {
                t.text = text.to_owned();
                let updated = Shape::Text(t.clone());
                vec![Action::Streaming(updated), Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// End text editing. Empty text deletes the shape; otherwise the final
    /// state is committed.
    pub fn commit_text(&mut self) -> Vec<Action> {
        let Gesture::EditingText { id } = std::mem::take(&mut self.gesture) else {
            return Vec::new();
        };
        let Some(index) = self.shapes.iter().position(|s| s.id() == id) else {
            return Vec::new();
        };
        let is_empty = matches!(&self.shapes[index], Shape::Text(t) if t.text.is_empty());
        if is_empty {
            let removed = self.shapes.remove(index);
            if self.selected.as_deref() == Some(removed.id()) {
                self.selected = None;
            }
            vec![Action::Erase(removed), Action::RenderNeeded]
        } else {
            let shape = self.shapes[index].clone();
            vec![Action::Commit(shape), Action::RenderNeeded]
        }
    }

    // ── Room-wide commands ──────────────────────────────────────

    /// Delete every shape in the room and broadcast the clear.
    pub fn clear(&mut self) -> Vec<Action> {
        self.shapes.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        vec![Action::Clear, Action::RenderNeeded]
    }

    /// Seed the shape list from room history. Resets selection and any
    /// gesture; input must not have been accepted before this.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.selected = None;
        self.gesture = Gesture::Idle;
    }

    // ── Remote application ──────────────────────────────────────

    /// Apply a peer's committed shape: replace in place by id, else append.
    pub fn apply_commit(&mut self, shape: Shape) {
        self.upsert(shape);
    }

    /// Apply a peer's live-preview frame. Same upsert semantics as commit;
    /// only the last-applied state matters for rendering.
    pub fn apply_streaming(&mut self, shape: Shape) {
        self.upsert(shape);
    }

    /// Apply a peer's in-place mutation.
    pub fn apply_update(&mut self, shape: Shape) {
        self.upsert(shape);
    }

    fn upsert(&mut self, shape: Shape) {
        match self.shape_mut(shape.id()) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Apply a peer's erase. Unknown ids are dropped silently; an active
    /// gesture on the erased shape is cancelled.
    pub fn apply_erase(&mut self, id: &str) {
        let Some(index) = self.shapes.iter().position(|s| s.id() == id) else {
            return;
        };
        self.shapes.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        let gesture_target = match &self.gesture {
            Gesture::Moving { id, .. }
            | Gesture::Resizing { id, .. }
            | Gesture::EditingText { id } => Some(id.as_str()),
            _ => None,
        };
        if gesture_target == Some(id) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Apply a peer's room clear: everything goes, unconditionally.
    pub fn apply_clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
    }
}
