//! Shared message model and JSON codec for the realtime WS transport.
//!
//! This crate owns the wire representation used by both `relay` and `client`.
//! Messages are JSON text frames tagged by `type`; shape payloads travel as
//! JSON *strings* nested inside the `message` / `shape` fields, so the relay
//! can forward them without ever interpreting drawing semantics.
//!
//! The same [`Message`] type is used in both directions: the relay re-emits
//! what it received, minus the sender.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// Error returned by [`Message::decode`] and the payload constructors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text could not be decoded as a known message, or a payload
    /// could not be serialized.
    #[error("malformed wire message: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single message on the realtime wire protocol.
///
/// Tag names and field names are fixed by the protocol; do not rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Add this connection to the room's recipient set.
    #[serde(rename = "join_room")]
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Remove this connection from the room's recipient set.
    #[serde(rename = "leave_room")]
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// Commit a finished shape. Broadcast to all other members and persisted
    /// keyed by room.
    #[serde(rename = "chat")]
    Chat {
        #[serde(rename = "roomId")]
        room_id: String,
        /// JSON-stringified shape.
        message: String,
    },
    /// Uncommitted preview frame for an in-progress gesture. Broadcast only.
    #[serde(rename = "streamingShape")]
    StreamingShape {
        #[serde(rename = "roomId")]
        room_id: String,
        /// JSON-stringified shape.
        shape: String,
    },
    /// In-place mutation of an existing committed shape. Broadcast only.
    #[serde(rename = "updateShape")]
    UpdateShape {
        #[serde(rename = "roomId")]
        room_id: String,
        /// JSON-stringified shape.
        shape: String,
    },
    /// Delete a shape by id. Broadcast only; only the id is significant to
    /// receivers.
    #[serde(rename = "eraseShape")]
    EraseShape {
        #[serde(rename = "roomId")]
        room_id: String,
        /// JSON-stringified shape.
        shape: String,
    },
    /// Delete every shape in the room and purge its persisted history.
    #[serde(rename = "clearslate")]
    ClearSlate {
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

impl Message {
    /// Build a `chat` commit carrying a serialized shape payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the payload cannot be serialized.
    pub fn chat<T: Serialize>(room_id: impl Into<String>, payload: &T) -> Result<Self, CodecError> {
        Ok(Self::Chat { room_id: room_id.into(), message: serde_json::to_string(payload)? })
    }

    /// Build a `streamingShape` preview frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the payload cannot be serialized.
    pub fn streaming<T: Serialize>(room_id: impl Into<String>, payload: &T) -> Result<Self, CodecError> {
        Ok(Self::StreamingShape { room_id: room_id.into(), shape: serde_json::to_string(payload)? })
    }

    /// Build an `updateShape` mutation.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the payload cannot be serialized.
    pub fn update<T: Serialize>(room_id: impl Into<String>, payload: &T) -> Result<Self, CodecError> {
        Ok(Self::UpdateShape { room_id: room_id.into(), shape: serde_json::to_string(payload)? })
    }

    /// Build an `eraseShape` deletion naming the erased shape.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the payload cannot be serialized.
    pub fn erase<T: Serialize>(room_id: impl Into<String>, payload: &T) -> Result<Self, CodecError> {
        Ok(Self::EraseShape { room_id: room_id.into(), shape: serde_json::to_string(payload)? })
    }

    /// The room this message addresses.
    #[must_use]
    pub fn room_id(&self) -> &str {
        match self {
            Self::JoinRoom { room_id }
            | Self::LeaveRoom { room_id }
            | Self::Chat { room_id, .. }
            | Self::StreamingShape { room_id, .. }
            | Self::UpdateShape { room_id, .. }
            | Self::EraseShape { room_id, .. }
            | Self::ClearSlate { room_id } => room_id,
        }
    }

    /// The raw stringified shape payload, if this message kind carries one.
    #[must_use]
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            Self::Chat { message, .. } => Some(message),
            Self::StreamingShape { shape, .. }
            | Self::UpdateShape { shape, .. }
            | Self::EraseShape { shape, .. } => Some(shape),
            Self::JoinRoom { .. } | Self::LeaveRoom { .. } | Self::ClearSlate { .. } => None,
        }
    }

    /// Re-parse the nested shape payload.
    ///
    /// Returns `None` for message kinds without a payload and for payloads
    /// that fail to parse — peers must never crash on a malformed peer
    /// message, so callers treat `None` as a silent drop.
    #[must_use]
    pub fn payload<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_str(self.raw_payload()?).ok()
    }

    /// Encode to a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] on serialization failure (cannot occur
    /// for well-formed messages in practice).
    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] for malformed text or an unknown `type`
    /// tag.
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
