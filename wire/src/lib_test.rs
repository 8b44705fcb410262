use serde_json::json;

use super::*;

// =============================================================
// Encode / decode
// =============================================================

#[test]
fn join_room_round_trips() {
    let msg = Message::JoinRoom { room_id: "room-1".into() };
    let text = msg.encode().expect("encode");
    assert_eq!(Message::decode(&text).expect("decode"), msg);
}

#[test]
fn join_room_uses_protocol_tag_and_field_names() {
    let msg = Message::JoinRoom { room_id: "room-1".into() };
    let value: serde_json::Value = serde_json::from_str(&msg.encode().expect("encode")).expect("json");
    assert_eq!(value["type"], "join_room");
    assert_eq!(value["roomId"], "room-1");
}

#[test]
fn chat_nests_payload_as_string() {
    let payload = json!({ "type": "rect", "id": "s1", "x": 1.0 });
    let msg = Message::chat("room-1", &payload).expect("chat");
    let value: serde_json::Value = serde_json::from_str(&msg.encode().expect("encode")).expect("json");

    assert_eq!(value["type"], "chat");
    // The payload travels as a JSON string, not an inline object.
    assert!(value["message"].is_string());
    let inner: serde_json::Value =
        serde_json::from_str(value["message"].as_str().expect("string")).expect("inner json");
    assert_eq!(inner["id"], "s1");
}

#[test]
fn streaming_update_erase_use_shape_field() {
    let payload = json!({ "id": "s1" });
    for msg in [
        Message::streaming("r", &payload).expect("streaming"),
        Message::update("r", &payload).expect("update"),
        Message::erase("r", &payload).expect("erase"),
    ] {
        let value: serde_json::Value = serde_json::from_str(&msg.encode().expect("encode")).expect("json");
        assert!(value["shape"].is_string(), "missing shape field in {value}");
    }
}

#[test]
fn clearslate_round_trips() {
    let msg = Message::ClearSlate { room_id: "room-9".into() };
    let text = msg.encode().expect("encode");
    let back = Message::decode(&text).expect("decode");
    assert_eq!(back, msg);
    assert_eq!(back.room_id(), "room-9");
}

#[test]
fn decode_rejects_unknown_type() {
    let err = Message::decode(r#"{"type":"nonsense","roomId":"r"}"#);
    assert!(err.is_err());
}

#[test]
fn decode_rejects_missing_required_field() {
    // `chat` without `message` must fail decoding, not default.
    let err = Message::decode(r#"{"type":"chat","roomId":"r"}"#);
    assert!(err.is_err());
}

#[test]
fn decode_rejects_invalid_json() {
    assert!(Message::decode("not json at all").is_err());
}

// =============================================================
// Payload access
// =============================================================

#[test]
fn payload_parses_nested_json() {
    let msg = Message::update("r", &json!({ "id": "abc", "x": 2.5 })).expect("update");
    let parsed: serde_json::Value = msg.payload().expect("payload");
    assert_eq!(parsed["id"], "abc");
    assert_eq!(parsed["x"], 2.5);
}

#[test]
fn payload_returns_none_for_malformed_nested_json() {
    let msg = Message::UpdateShape { room_id: "r".into(), shape: "{broken".into() };
    let parsed: Option<serde_json::Value> = msg.payload();
    assert!(parsed.is_none());
}

#[test]
fn payload_returns_none_for_payloadless_kinds() {
    let msg = Message::LeaveRoom { room_id: "r".into() };
    let parsed: Option<serde_json::Value> = msg.payload();
    assert!(parsed.is_none());
    assert!(msg.raw_payload().is_none());
}

#[test]
fn room_id_accessor_covers_all_kinds() {
    let payload = json!({ "id": "s" });
    let msgs = [
        Message::JoinRoom { room_id: "r".into() },
        Message::LeaveRoom { room_id: "r".into() },
        Message::chat("r", &payload).expect("chat"),
        Message::streaming("r", &payload).expect("streaming"),
        Message::update("r", &payload).expect("update"),
        Message::erase("r", &payload).expect("erase"),
        Message::ClearSlate { room_id: "r".into() },
    ];
    for msg in msgs {
        assert_eq!(msg.room_id(), "r");
    }
}

#[test]
fn decode_matches_hand_written_client_frame() {
    // Frame shape as emitted by the original web client.
    let text = r#"{"type":"chat","message":"{\"type\":\"rect\",\"id\":\"x\"}","roomId":"42"}"#;
    let msg = Message::decode(text).expect("decode");
    assert_eq!(msg.room_id(), "42");
    let inner: serde_json::Value = msg.payload().expect("payload");
    assert_eq!(inner["type"], "rect");
}
