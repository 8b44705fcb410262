//! Room history fetch.
//!
//! Committed shapes are replayed over HTTP before the socket goes live so
//! the session starts from the room's current state rather than an empty
//! canvas. The relay's response is an envelope of raw shape payloads:
//!
//! ```json
//! {"messages": [{"message": "{\"type\":\"rect\",...}"}, ...]}
//! ```

use serde_json::Value;

use crate::net::SyncError;

/// Fetch the committed shape history for a room.
///
/// `base_url` is the relay's HTTP origin (no trailing slash); the token is
/// presented as a bearer credential.
///
/// # Errors
///
/// Returns [`SyncError::Http`] on transport or non-2xx status and
/// [`SyncError::MalformedHistory`] when the body is not the expected
/// envelope.
pub async fn fetch_history(
    base_url: &str,
    token: &str,
    room_id: &str,
) -> Result<Vec<String>, SyncError> {
    let url = format!("{base_url}/rooms/{room_id}/shapes");
    let body: Value = reqwest::Client::new()
        .get(&url)
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    parse_history(&body).ok_or(SyncError::MalformedHistory)
}

/// Extract the raw shape payloads from a history envelope. Entries without
/// a string `message` field are skipped rather than failing the whole
/// load; `None` means the envelope itself is missing.
pub(crate) fn parse_history(body: &Value) -> Option<Vec<String>> {
    let messages = body.get("messages")?.as_array()?;
    Some(
        messages
            .iter()
            .filter_map(|entry| entry.get("message")?.as_str())
            .map(str::to_owned)
            .collect(),
    )
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;
