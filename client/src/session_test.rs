use canvas::shape::{DrawingProperties, Shape};
use wire::Message;

use super::*;

const ROOM: &str = "room1";

fn shape(id: &str, x: f64) -> Shape {
    Shape::rect(id.into(), &DrawingProperties::default(), x, 0.0, 20.0, 20.0)
}

fn payload(s: &Shape) -> String {
    s.to_wire().unwrap()
}

fn ready_session() -> Session {
    let mut session = Session::new(ROOM);
    session.handle(Event::HistoryLoaded(Vec::new()));
    session
}

fn sends(outputs: &[Output]) -> Vec<&Message> {
    outputs
        .iter()
        .filter_map(|o| match o {
            Output::Send(m) => Some(m),
            _ => None,
        })
        .collect()
}

// ===== LIFECYCLE =====

#[test]
fn starts_loading_and_becomes_ready_after_history() {
    let mut session = Session::new(ROOM);
    assert_eq!(session.phase(), Phase::Loading);
    let outputs = session.handle(Event::HistoryLoaded(vec![payload(&shape("a", 0.0))]));
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(outputs, vec![Output::Render]);
    assert_eq!(session.shapes().len(), 1);
}

#[test]
fn join_message_names_the_room() {
    let session = Session::new(ROOM);
    assert_eq!(session.join_message(), Message::JoinRoom { room_id: ROOM.into() });
}

#[test]
fn pointer_input_is_ignored_while_loading() {
    let mut session = Session::new(ROOM);
    let outputs = session.handle(Event::Pointer(PointerEvent::down(10.0, 10.0)));
    assert!(outputs.is_empty());
    let outputs = session.handle(Event::Pointer(PointerEvent::up(10.0, 10.0)));
    assert!(outputs.is_empty());

    session.handle(Event::HistoryLoaded(Vec::new()));
    assert!(session.shapes().is_empty());
}

#[test]
fn malformed_history_entries_are_skipped() {
    let mut session = Session::new(ROOM);
    session.handle(Event::HistoryLoaded(vec![
        payload(&shape("a", 0.0)),
        "not json".into(),
        r#"{"type":"hexagon","id":"x"}"#.into(),
        payload(&shape("b", 50.0)),
    ]));
    assert_eq!(session.shapes().len(), 2);
}

// ===== LOADING QUEUE =====

#[test]
fn frames_arriving_during_load_apply_after_history() {
    let mut session = Session::new(ROOM);
    let s = shape("live", 5.0);
    session.handle(Event::Wire(Message::chat(ROOM, &s).unwrap()));
    assert!(session.shapes().is_empty());

    session.handle(Event::HistoryLoaded(vec![payload(&shape("old", 0.0))]));
    assert_eq!(session.shapes().len(), 2);
}

#[test]
fn queued_erase_beats_queued_update_regardless_of_order() {
    let mut session = Session::new(ROOM);
    let s = shape("x", 5.0);
    // Update arrives before the erase; the erase must still win.
    session.handle(Event::Wire(Message::update(ROOM, &s).unwrap()));
    session.handle(Event::Wire(Message::erase(ROOM, &s).unwrap()));

    session.handle(Event::HistoryLoaded(vec![payload(&shape("x", 0.0))]));
    assert!(session.shapes().is_empty());
}

#[test]
fn frames_for_other_rooms_are_never_queued() {
    let mut session = Session::new(ROOM);
    let s = shape("x", 5.0);
    session.handle(Event::Wire(Message::chat("other-room", &s).unwrap()));
    session.handle(Event::HistoryLoaded(Vec::new()));
    assert!(session.shapes().is_empty());
}

// ===== LOCAL GESTURES → WIRE =====

#[test]
fn rect_gesture_streams_then_commits() {
    let mut session = ready_session();
    session.handle(Event::ToolSelected(canvas::input::Tool::Rect));

    session.handle(Event::Pointer(PointerEvent::down(10.0, 10.0)));
    let outputs = session.handle(Event::Pointer(PointerEvent::moved(50.0, 40.0)));
    assert!(matches!(sends(&outputs).as_slice(), [Message::StreamingShape { .. }]));

    let outputs = session.handle(Event::Pointer(PointerEvent::up(50.0, 40.0)));
    let sent = sends(&outputs);
    let [Message::Chat { room_id, message }] = sent.as_slice() else {
        panic!("expected one commit, got {sent:?}");
    };
    assert_eq!(room_id.as_str(), ROOM);
    let committed: serde_json::Value = serde_json::from_str(message).unwrap();
    assert_eq!(committed["type"], "rect");
    assert_eq!(committed["width"], 40.0);
    assert_eq!(committed["height"], 30.0);
}

#[test]
fn clear_request_broadcasts_clearslate() {
    let mut session = ready_session();
    let outputs = session.handle(Event::ClearRequested);
    assert!(sends(&outputs)
        .iter()
        .any(|m| matches!(m, Message::ClearSlate { room_id } if room_id == ROOM)));
}

#[test]
fn text_flow_opens_editor_then_streams_then_commits() {
    let mut session = ready_session();
    session.handle(Event::ToolSelected(canvas::input::Tool::Text));
    let outputs = session.handle(Event::Pointer(PointerEvent::down(30.0, 40.0)));
    assert!(outputs.iter().any(|o| matches!(o, Output::OpenTextEditor { .. })));

    let outputs = session.handle(Event::TextInput("hello".into()));
    assert!(matches!(sends(&outputs).as_slice(), [Message::StreamingShape { .. }]));

    let outputs = session.handle(Event::TextCommitted);
    assert!(matches!(sends(&outputs).as_slice(), [Message::Chat { .. }]));
}

// ===== REMOTE FRAMES =====

#[test]
fn two_streaming_frames_then_commit_leave_one_shape() {
    let mut session = ready_session();
    session.handle(Event::Wire(Message::streaming(ROOM, &shape("s", 1.0)).unwrap()));
    session.handle(Event::Wire(Message::streaming(ROOM, &shape("s", 2.0)).unwrap()));
    let committed = shape("s", 3.0);
    session.handle(Event::Wire(Message::chat(ROOM, &committed).unwrap()));

    assert_eq!(session.shapes(), &[committed]);
}

#[test]
fn erase_for_unknown_id_changes_nothing() {
    let mut session = ready_session();
    session.handle(Event::Wire(Message::chat(ROOM, &shape("a", 0.0)).unwrap()));
    let outputs = session.handle(Event::Wire(Message::erase(ROOM, &shape("ghost", 0.0)).unwrap()));
    assert_eq!(session.shapes().len(), 1);
    // Still renders; the engine treats the drop as a silent no-op.
    assert_eq!(outputs, vec![Output::Render]);
}

#[test]
fn frames_for_other_rooms_are_dropped_when_ready() {
    let mut session = ready_session();
    let outputs = session.handle(Event::Wire(Message::chat("elsewhere", &shape("a", 0.0)).unwrap()));
    assert!(outputs.is_empty());
    assert!(session.shapes().is_empty());
}

#[test]
fn malformed_payload_is_dropped_silently() {
    let mut session = ready_session();
    let message = Message::StreamingShape { room_id: ROOM.into(), shape: "{broken".into() };
    let outputs = session.handle(Event::Wire(message));
    assert!(outputs.is_empty());
    assert!(session.shapes().is_empty());
}

#[test]
fn remote_clearslate_empties_the_list() {
    let mut session = ready_session();
    session.handle(Event::Wire(Message::chat(ROOM, &shape("a", 0.0)).unwrap()));
    session.handle(Event::Wire(Message::ClearSlate { room_id: ROOM.into() }));
    assert!(session.shapes().is_empty());
}
