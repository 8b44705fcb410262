//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the live room map plus the two pluggable collaborators: the
//! credential resolver and the committed-shape store. Each room tracks its
//! connected clients as per-connection outbound channels; the relay itself
//! never interprets shape payloads.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use wire::Message;

use crate::auth::AuthProvider;
use crate::store::ShapeStore;

// =============================================================================
// ROOM STATE
// =============================================================================

/// Per-room live state: connected clients keyed by connection id, each with
/// a sender for outbound messages.
#[derive(Default)]
pub struct RoomState {
    pub clients: HashMap<Uuid, mpsc::Sender<Message>>,
}

impl RoomState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum — all inner fields
/// are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<String, RoomState>>>,
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn ShapeStore>,
}

impl AppState {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn ShapeStore>) -> Self {
        Self { rooms: Arc::new(RwLock::new(HashMap::new())), auth, store }
    }

    /// Register a connection in a room, creating the room on first join.
    pub async fn join_room(&self, room_id: &str, conn_id: Uuid, tx: mpsc::Sender<Message>) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(room_id.to_owned()).or_default().clients.insert(conn_id, tx);
    }

    /// Drop a connection from a room. Empty rooms are evicted so the map
    /// does not grow without bound.
    pub async fn leave_room(&self, room_id: &str, conn_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(room) = rooms.get_mut(room_id) {
            room.clients.remove(&conn_id);
            if room.clients.is_empty() {
                rooms.remove(room_id);
            }
        }
    }

    /// Whether a connection currently belongs to a room.
    pub async fn is_member(&self, room_id: &str, conn_id: Uuid) -> bool {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).is_some_and(|room| room.clients.contains_key(&conn_id))
    }

    /// Fan a message out to every room member except the sender.
    pub async fn broadcast(&self, room_id: &str, message: &Message, exclude: Uuid) {
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(room_id) else {
            return;
        };
        for (conn_id, tx) in &room.clients {
            if *conn_id == exclude {
                continue;
            }
            // Best-effort: if a client's channel is full, skip it.
            if let Err(e) = tx.try_send(message.clone()) {
                tracing::debug!(%conn_id, error = %e, "skipping slow client");
            }
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
