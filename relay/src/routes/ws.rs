//! WebSocket handler — room-scoped message relay.
//!
//! DESIGN
//! ======
//! On upgrade, the `token` query parameter is resolved to an identity, the
//! connection gets a fresh id and an outbound channel, and the handler
//! enters a `select!` loop:
//! - Incoming text frames → parse + dispatch by message type
//! - Broadcast messages from room peers → forward to the socket
//!
//! The relay never looks inside shape payloads. Its job per message type:
//! membership bookkeeping (`join_room` / `leave_room`), persistence for
//! commits (`chat`) and purges (`clearslate`), and fan-out to every other
//! member of the target room. A connection that has not joined a room can
//! neither send into it nor receive from it.
//!
//! Malformed frames and frames for unjoined rooms are logged and dropped;
//! nothing is ever reported back to the sender.

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;

use std::collections::{HashMap, HashSet};

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use wire::Message;

use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(token) = params.get("token") else {
        return (StatusCode::UNAUTHORIZED, "token required").into_response();
    };

    let Some(user_id) = state.auth.authenticate(token).await else {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    };

    ws.on_upgrade(move |socket| run_ws(socket, state, user_id))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState, user_id: String) {
    let conn_id = Uuid::new_v4();

    // Per-connection channel for receiving broadcast messages from peers.
    let (conn_tx, mut conn_rx) = mpsc::channel::<Message>(256);

    // Rooms this connection has joined, for cleanup on close.
    let mut joined: HashSet<String> = HashSet::new();

    info!(%conn_id, %user_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    WsMessage::Text(text) => {
                        handle_text(&state, conn_id, &conn_tx, &mut joined, text.as_str()).await;
                    }
                    WsMessage::Close(_) => break,
                    _ => {}
                }
            }
            Some(message) = conn_rx.recv() => {
                let Ok(text) = message.encode() else { continue };
                if socket.send(WsMessage::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    for room_id in &joined {
        state.leave_room(room_id, conn_id).await;
    }
    info!(%conn_id, "ws: client disconnected");
}

// =============================================================================
// MESSAGE DISPATCH
// =============================================================================

/// Parse one incoming text frame and apply it: membership bookkeeping,
/// persistence, fan-out. Split from the socket loop so the relay semantics
/// are testable without a live connection.
pub(crate) async fn handle_text(
    state: &AppState,
    conn_id: Uuid,
    outbound: &mpsc::Sender<Message>,
    joined: &mut HashSet<String>,
    text: &str,
) {
    let message = match Message::decode(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(%conn_id, error = %e, "dropping malformed frame");
            return;
        }
    };

    match &message {
        Message::JoinRoom { room_id } => {
            state.join_room(room_id, conn_id, outbound.clone()).await;
            joined.insert(room_id.clone());
        }
        Message::LeaveRoom { room_id } => {
            state.leave_room(room_id, conn_id).await;
            joined.remove(room_id);
        }
        Message::Chat { room_id, message: payload } => {
            if !joined.contains(room_id) {
                warn!(%conn_id, room_id, "dropping frame for unjoined room");
                return;
            }
            if let Err(e) = state.store.append(room_id, payload.clone()).await {
                warn!(room_id, error = %e, "failed to persist committed shape");
            }
            state.broadcast(room_id, &message, conn_id).await;
        }
        Message::StreamingShape { room_id, .. }
        | Message::UpdateShape { room_id, .. }
        | Message::EraseShape { room_id, .. } => {
            if !joined.contains(room_id) {
                warn!(%conn_id, room_id, "dropping frame for unjoined room");
                return;
            }
            state.broadcast(room_id, &message, conn_id).await;
        }
        Message::ClearSlate { room_id } => {
            if !joined.contains(room_id) {
                warn!(%conn_id, room_id, "dropping frame for unjoined room");
                return;
            }
            if let Err(e) = state.store.purge(room_id).await {
                warn!(room_id, error = %e, "failed to purge room store");
            }
            state.broadcast(room_id, &message, conn_id).await;
        }
    }
}
