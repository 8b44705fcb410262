//! Committed-shape persistence.
//!
//! The relay does not interpret shape payloads; it stores the raw JSON
//! strings carried by `chat` messages so late joiners can seed their shape
//! list. Real deployments back [`ShapeStore`] with a database; the bundled
//! [`MemoryStore`] keeps a bounded per-room window in memory, matching the
//! history endpoint's "most recent N" contract.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Most recent committed shapes retained (and served) per room.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("shape store backend unavailable: {0}")]
    Backend(String),
}

/// Append-only, per-room storage of committed shape payloads.
#[async_trait]
pub trait ShapeStore: Send + Sync {
    /// Record one committed shape payload for a room.
    async fn append(&self, room_id: &str, payload: String) -> Result<(), StoreError>;

    /// The most recent payloads for a room, oldest first, bounded by
    /// [`HISTORY_LIMIT`].
    async fn history(&self, room_id: &str) -> Result<Vec<String>, StoreError>;

    /// Delete everything stored for a room.
    async fn purge(&self, room_id: &str) -> Result<(), StoreError>;
}

/// In-memory store with a bounded window per room.
#[derive(Default)]
pub struct MemoryStore {
    rooms: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShapeStore for MemoryStore {
    async fn append(&self, room_id: &str, payload: String) -> Result<(), StoreError> {
        let mut rooms = self.rooms.write().await;
        let entries = rooms.entry(room_id.to_owned()).or_default();
        entries.push(payload);
        // Keep only the serving window; older entries are gone for good.
        if entries.len() > HISTORY_LIMIT {
            let overflow = entries.len() - HISTORY_LIMIT;
            entries.drain(..overflow);
        }
        Ok(())
    }

    async fn history(&self, room_id: &str) -> Result<Vec<String>, StoreError> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(room_id).cloned().unwrap_or_default())
    }

    async fn purge(&self, room_id: &str) -> Result<(), StoreError> {
        let mut rooms = self.rooms.write().await;
        rooms.remove(room_id);
        Ok(())
    }
}
