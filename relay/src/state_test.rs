use uuid::Uuid;

use super::test_helpers::{join, test_app_state};
use wire::Message;

#[tokio::test]
async fn join_makes_a_connection_a_member() {
    let state = test_app_state();
    let conn = Uuid::new_v4();
    let _rx = join(&state, "r", conn).await;
    assert!(state.is_member("r", conn).await);
    assert!(!state.is_member("other", conn).await);
}

#[tokio::test]
async fn empty_rooms_are_evicted_on_last_leave() {
    let state = test_app_state();
    let conn = Uuid::new_v4();
    let _rx = join(&state, "r", conn).await;
    state.leave_room("r", conn).await;

    assert!(!state.is_member("r", conn).await);
    assert!(state.rooms.read().await.is_empty());
}

#[tokio::test]
async fn broadcast_skips_the_sender() {
    let state = test_app_state();
    let sender = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let mut sender_rx = join(&state, "r", sender).await;
    let mut peer_rx = join(&state, "r", peer).await;

    let message = Message::JoinRoom { room_id: "r".into() };
    state.broadcast("r", &message, sender).await;

    assert_eq!(peer_rx.try_recv().unwrap(), message);
    assert!(sender_rx.try_recv().is_err());
}

#[tokio::test]
async fn broadcast_to_unknown_room_is_a_no_op() {
    let state = test_app_state();
    state.broadcast("ghost", &Message::ClearSlate { room_id: "ghost".into() }, Uuid::new_v4()).await;
}

#[tokio::test]
async fn full_channel_does_not_block_other_members() {
    let state = test_app_state();
    let sender = Uuid::new_v4();
    let slow = Uuid::new_v4();
    let fast = Uuid::new_v4();

    // A 1-slot channel that is already full.
    let (slow_tx, _slow_rx) = tokio::sync::mpsc::channel(1);
    slow_tx.try_send(Message::ClearSlate { room_id: "r".into() }).unwrap();
    state.join_room("r", slow, slow_tx).await;
    let mut fast_rx = join(&state, "r", fast).await;

    let message = Message::JoinRoom { room_id: "r".into() };
    state.broadcast("r", &message, sender).await;
    assert_eq!(fast_rx.try_recv().unwrap(), message);
}
