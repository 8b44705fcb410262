use serde_json::json;

use super::parse_history;

#[test]
fn extracts_payloads_in_order() {
    let body = json!({
        "messages": [
            {"message": "{\"type\":\"rect\",\"id\":\"a\"}"},
            {"message": "{\"type\":\"line\",\"id\":\"b\"}"},
        ]
    });
    let payloads = parse_history(&body).unwrap();
    assert_eq!(payloads.len(), 2);
    assert!(payloads[0].contains("\"a\""));
    assert!(payloads[1].contains("\"b\""));
}

#[test]
fn empty_room_yields_empty_list() {
    let body = json!({"messages": []});
    assert_eq!(parse_history(&body).unwrap(), Vec::<String>::new());
}

#[test]
fn entries_without_a_message_field_are_skipped() {
    let body = json!({
        "messages": [
            {"message": "{\"type\":\"rect\"}"},
            {"sender": "someone"},
            {"message": 42},
        ]
    });
    let payloads = parse_history(&body).unwrap();
    assert_eq!(payloads.len(), 1);
}

#[test]
fn missing_envelope_is_rejected() {
    assert!(parse_history(&json!({"shapes": []})).is_none());
    assert!(parse_history(&json!({"messages": "nope"})).is_none());
    assert!(parse_history(&json!(null)).is_none());
}
