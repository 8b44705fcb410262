//! Room session: the single-threaded core of the sync client.
//!
//! A [`Session`] owns one room's [`EngineCore`] and runs a two-phase
//! lifecycle. In [`Phase::Loading`] the room history has not arrived yet:
//! local input is ignored (never applied to a not-yet-populated list) and
//! peer messages are queued. [`Event::HistoryLoaded`] seeds the shape list,
//! drains the queue, and flips to [`Phase::Ready`], where every event is
//! applied immediately.
//!
//! When the queue is drained, an erase wins over any queued commit or
//! update for the same shape id, regardless of arrival order within the
//! queue — otherwise a stale in-flight update would resurrect a shape a
//! peer already deleted.
//!
//! All inputs funnel through [`Session::handle`]; the returned [`Output`]s
//! tell the caller what to send and when to redraw. The session itself
//! performs no I/O.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashSet;

use canvas::engine::{Action, EngineCore};
use canvas::input::{PointerEvent, Tool};
use canvas::shape::{DrawingProperties, Shape};
use wire::Message;

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for room history; input ignored, peer messages queued.
    Loading,
    /// Steady state; everything applies immediately.
    Ready,
}

/// One input to the session, local or remote.
#[derive(Debug, Clone)]
pub enum Event {
    /// Raw shape payloads from the history fetch, oldest first.
    HistoryLoaded(Vec<String>),
    /// A frame from the relay.
    Wire(Message),
    /// Local pointer input, already in world coordinates.
    Pointer(PointerEvent),
    /// Toolbar selection.
    ToolSelected(Tool),
    /// Style panel change.
    PropertiesChanged(DrawingProperties),
    /// Keystroke into the text editor.
    TextInput(String),
    /// The text editor closed (commit key or focus loss).
    TextCommitted,
    /// The user cleared the room.
    ClearRequested,
}

/// What the host must do in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Send this frame to the relay.
    Send(Message),
    /// Redraw the scene.
    Render,
    /// Open the text-input surface over the given text shape.
    OpenTextEditor { id: String },
}

/// Non-network outputs, as delivered on the host channel by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNotice {
    Render,
    OpenTextEditor { id: String },
}

/// One room's client-side state.
pub struct Session {
    room_id: String,
    engine: EngineCore,
    phase: Phase,
    /// Peer frames that arrived before history finished loading.
    pending: Vec<Message>,
}

impl Session {
    #[must_use]
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            engine: EngineCore::new(),
            phase: Phase::Loading,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.engine.shapes()
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.engine.selected_id()
    }

    #[must_use]
    pub fn transient_shape(&self) -> Option<&Shape> {
        self.engine.transient_shape()
    }

    /// The membership announcement sent immediately after connecting.
    #[must_use]
    pub fn join_message(&self) -> Message {
        Message::JoinRoom { room_id: self.room_id.clone() }
    }

    /// Apply one event and return the required side effects.
    pub fn handle(&mut self, event: Event) -> Vec<Output> {
        match self.phase {
            Phase::Loading => self.handle_loading(event),
            Phase::Ready => self.handle_ready(event),
        }
    }

    // ── Loading phase ───────────────────────────────────────────

    fn handle_loading(&mut self, event: Event) -> Vec<Output> {
        match event {
            Event::HistoryLoaded(payloads) => {
                // Malformed history entries are dropped, not fatal.
                let shapes = payloads.iter().filter_map(|p| Shape::from_wire(p)).collect();
                self.engine.load_snapshot(shapes);
                self.phase = Phase::Ready;
                self.drain_pending();
                vec![Output::Render]
            }
            Event::Wire(message) => {
                if message.room_id() == self.room_id {
                    self.pending.push(message);
                }
                Vec::new()
            }
            // Local input cannot touch a list that does not exist yet.
            _ => Vec::new(),
        }
    }

    /// Apply queued peer frames in arrival order, except that an erase
    /// anywhere in the queue beats commits/updates for the same id.
    fn drain_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let erased: HashSet<String> = pending
            .iter()
            .filter_map(|m| match m {
                Message::EraseShape { .. } => payload_id(m),
                _ => None,
            })
            .collect();

        for message in &pending {
            match message {
                Message::Chat { .. } | Message::StreamingShape { .. } | Message::UpdateShape { .. }
                    if payload_id(message).is_some_and(|id| erased.contains(&id)) => {}
                _ => {
                    self.apply_wire(message);
                }
            }
        }
    }

    // ── Ready phase ─────────────────────────────────────────────

    fn handle_ready(&mut self, event: Event) -> Vec<Output> {
        match event {
            Event::Pointer(pointer) => {
                let actions = self.engine.handle_pointer(pointer);
                self.outputs_for(actions)
            }
            Event::ToolSelected(tool) => {
                let actions = self.engine.set_tool(tool);
                self.outputs_for(actions)
            }
            Event::PropertiesChanged(props) => {
                let actions = self.engine.set_properties(props);
                self.outputs_for(actions)
            }
            Event::TextInput(text) => {
                let actions = self.engine.text_input(&text);
                self.outputs_for(actions)
            }
            Event::TextCommitted => {
                let actions = self.engine.commit_text();
                self.outputs_for(actions)
            }
            Event::ClearRequested => {
                let actions = self.engine.clear();
                self.outputs_for(actions)
            }
            Event::Wire(message) => {
                if self.apply_wire(&message) { vec![Output::Render] } else { Vec::new() }
            }
            // Already seeded; a duplicate history load is ignored.
            Event::HistoryLoaded(_) => Vec::new(),
        }
    }

    /// Apply a peer frame to the engine. Returns whether anything changed.
    /// Frames for other rooms and malformed payloads are dropped.
    fn apply_wire(&mut self, message: &Message) -> bool {
        if message.room_id() != self.room_id {
            return false;
        }
        match message {
            Message::Chat { .. } => match message.payload::<Shape>() {
                Some(shape) => {
                    self.engine.apply_commit(shape);
                    true
                }
                None => false,
            },
            Message::StreamingShape { .. } => match message.payload::<Shape>() {
                Some(shape) => {
                    self.engine.apply_streaming(shape);
                    true
                }
                None => false,
            },
            Message::UpdateShape { .. } => match message.payload::<Shape>() {
                Some(shape) => {
                    self.engine.apply_update(shape);
                    true
                }
                None => false,
            },
            // Only the id matters for erase; tolerate payloads that are not
            // a complete shape.
            Message::EraseShape { .. } => match payload_id(message) {
                Some(id) => {
                    self.engine.apply_erase(&id);
                    true
                }
                None => false,
            },
            Message::ClearSlate { .. } => {
                self.engine.apply_clear();
                true
            }
            // Membership frames are relay-side bookkeeping.
            Message::JoinRoom { .. } | Message::LeaveRoom { .. } => false,
        }
    }

    /// Map engine actions onto wire sends and host notices.
    fn outputs_for(&self, actions: Vec<Action>) -> Vec<Output> {
        let mut outputs = Vec::with_capacity(actions.len());
        for action in actions {
            let output = match action {
                Action::Commit(shape) => send_or_skip(Message::chat(self.room_id.as_str(), &shape)),
                Action::Streaming(shape) => {
                    send_or_skip(Message::streaming(self.room_id.as_str(), &shape))
                }
                Action::Update(shape) => send_or_skip(Message::update(self.room_id.as_str(), &shape)),
                Action::Erase(shape) => send_or_skip(Message::erase(self.room_id.as_str(), &shape)),
                Action::Clear => Some(Output::Send(Message::ClearSlate {
                    room_id: self.room_id.clone(),
                })),
                Action::RenderNeeded => Some(Output::Render),
                Action::OpenTextEditor { id } => Some(Output::OpenTextEditor { id }),
            };
            if let Some(output) = output {
                outputs.push(output);
            }
        }
        outputs
    }
}

/// Shape id carried by a message payload, if it parses at all.
fn payload_id(message: &Message) -> Option<String> {
    let value: serde_json::Value = message.payload()?;
    Some(value.get("id")?.as_str()?.to_owned())
}

/// Shape serialization cannot fail for shapes built by the engine; if it
/// somehow does, the frame is dropped rather than poisoning the session.
fn send_or_skip(result: Result<Message, wire::CodecError>) -> Option<Output> {
    match result {
        Ok(message) => Some(Output::Send(message)),
        Err(_) => None,
    }
}
