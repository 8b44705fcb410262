use std::collections::HashSet;

use tokio::sync::mpsc;
use uuid::Uuid;

use wire::Message;

use super::*;
use crate::state::test_helpers::test_app_state;

struct Conn {
    id: Uuid,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    joined: HashSet<String>,
}

fn conn() -> Conn {
    let (tx, rx) = mpsc::channel(16);
    Conn { id: Uuid::new_v4(), tx, rx, joined: HashSet::new() }
}

async fn send(state: &AppState, c: &mut Conn, text: &str) {
    handle_text(state, c.id, &c.tx, &mut c.joined, text).await;
}

fn join_frame(room: &str) -> String {
    format!(r#"{{"type":"join_room","roomId":"{room}"}}"#)
}

fn chat_frame(room: &str, payload: &str) -> String {
    serde_json::to_string(&serde_json::json!({
        "type": "chat", "roomId": room, "message": payload,
    }))
    .unwrap()
}

#[tokio::test]
async fn chat_reaches_other_members_but_not_sender() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut bob, &join_frame("room1")).await;

    send(&state, &mut alice, &chat_frame("room1", r#"{"id":"s1"}"#)).await;

    let received = bob.rx.try_recv().unwrap();
    assert_eq!(received.raw_payload(), Some(r#"{"id":"s1"}"#));
    assert!(alice.rx.try_recv().is_err(), "sender must not receive an echo");
}

#[tokio::test]
async fn frames_do_not_cross_rooms() {
    let state = test_app_state();
    let mut alice = conn();
    let mut carol = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut carol, &join_frame("room2")).await;

    send(&state, &mut alice, &chat_frame("room1", "{}")).await;
    assert!(carol.rx.try_recv().is_err());
}

#[tokio::test]
async fn sending_into_an_unjoined_room_is_dropped() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut bob, &join_frame("room1")).await;

    // Alice never joined room1.
    send(&state, &mut alice, &chat_frame("room1", "{}")).await;
    assert!(bob.rx.try_recv().is_err());
    assert!(state.store.history("room1").await.unwrap().is_empty());
}

#[tokio::test]
async fn chat_persists_the_raw_payload() {
    let state = test_app_state();
    let mut alice = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut alice, &chat_frame("room1", r#"{"id":"s1","type":"rect"}"#)).await;

    let history = state.store.history("room1").await.unwrap();
    assert_eq!(history, vec![r#"{"id":"s1","type":"rect"}"#]);
}

#[tokio::test]
async fn streaming_frames_are_relayed_but_never_persisted() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut bob, &join_frame("room1")).await;

    let frame = r#"{"type":"streamingShape","roomId":"room1","shape":"{\"id\":\"s1\"}"}"#;
    send(&state, &mut alice, frame).await;

    assert!(matches!(bob.rx.try_recv().unwrap(), Message::StreamingShape { .. }));
    assert!(state.store.history("room1").await.unwrap().is_empty());
}

#[tokio::test]
async fn clearslate_purges_history_and_broadcasts() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut bob, &join_frame("room1")).await;
    send(&state, &mut alice, &chat_frame("room1", "{}")).await;
    bob.rx.try_recv().unwrap();

    send(&state, &mut alice, r#"{"type":"clearslate","roomId":"room1"}"#).await;

    assert!(matches!(bob.rx.try_recv().unwrap(), Message::ClearSlate { .. }));
    assert!(state.store.history("room1").await.unwrap().is_empty());
}

#[tokio::test]
async fn leave_room_stops_delivery() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut bob, &join_frame("room1")).await;

    send(&state, &mut bob, r#"{"type":"leave_room","roomId":"room1"}"#).await;
    send(&state, &mut alice, &chat_frame("room1", "{}")).await;

    assert!(bob.rx.try_recv().is_err());
}

#[tokio::test]
async fn malformed_frames_are_dropped_silently() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut bob, &join_frame("room1")).await;

    send(&state, &mut alice, "not json").await;
    send(&state, &mut alice, r#"{"type":"unknownKind","roomId":"room1"}"#).await;
    send(&state, &mut alice, r#"{"type":"chat"}"#).await;

    assert!(bob.rx.try_recv().is_err());
}

// ===== LIVE SOCKET =====

mod live {
    use futures::{SinkExt, StreamExt};
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message as TungsteniteMessage;

    use crate::routes;
    use crate::state::test_helpers::test_app_state;

    async fn serve() -> String {
        let state = test_app_state();
        let app = routes::app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("ws://{addr}/ws")
    }

    #[tokio::test]
    async fn upgrade_requires_a_valid_token() {
        let url = serve().await;
        assert!(connect_async(&url).await.is_err(), "no token must be refused");
        assert!(connect_async(format!("{url}?token=")).await.is_err());
        assert!(connect_async(format!("{url}?token=alice")).await.is_ok());
    }

    #[tokio::test]
    async fn commit_is_relayed_to_the_other_member_only() {
        let url = serve().await;
        let (mut alice, _) = connect_async(format!("{url}?token=alice")).await.unwrap();
        let (mut bob, _) = connect_async(format!("{url}?token=bob")).await.unwrap();

        let join = r#"{"type":"join_room","roomId":"room1"}"#;
        alice.send(TungsteniteMessage::text(join)).await.unwrap();
        bob.send(TungsteniteMessage::text(join)).await.unwrap();
        // Joins are processed in arrival order per connection, so the next
        // frame from alice lands after her own join; give bob's a moment.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let chat = r#"{"type":"chat","roomId":"room1","message":"{\"id\":\"s1\"}"}"#;
        alice.send(TungsteniteMessage::text(chat)).await.unwrap();

        let received = tokio::time::timeout(std::time::Duration::from_secs(2), bob.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(received.to_text().unwrap()).unwrap();
        assert_eq!(value["type"], "chat");
        assert_eq!(value["message"], r#"{"id":"s1"}"#);

        // No echo back to the sender.
        let echo = tokio::time::timeout(std::time::Duration::from_millis(200), alice.next()).await;
        assert!(echo.is_err(), "sender received an echo: {echo:?}");
    }
}

#[tokio::test]
async fn rejoining_after_leave_works() {
    let state = test_app_state();
    let mut alice = conn();
    let mut bob = conn();
    send(&state, &mut alice, &join_frame("room1")).await;
    send(&state, &mut bob, &join_frame("room1")).await;
    send(&state, &mut bob, r#"{"type":"leave_room","roomId":"room1"}"#).await;
    send(&state, &mut bob, &join_frame("room1")).await;

    send(&state, &mut alice, &chat_frame("room1", "{}")).await;
    assert!(bob.rx.try_recv().is_ok());
}
