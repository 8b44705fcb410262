//! Room history endpoint.
//!
//! `GET /rooms/{room_id}/shapes` returns the most recent committed shape
//! payloads for a room, oldest first, wrapped the way clients expect:
//!
//! ```json
//! {"messages": [{"message": "<json-stringified shape>"}, ...]}
//! ```
//!
//! The bearer credential comes from the `Authorization` header, with or
//! without the `Bearer ` prefix.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub message: String,
}

pub async fn room_shapes(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, "authorization required").into_response();
    };
    if state.auth.authenticate(token).await.is_none() {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }

    match state.store.history(&room_id).await {
        Ok(payloads) => Json(history_response(payloads)).into_response(),
        Err(e) => {
            tracing::error!(room_id, error = %e, "history fetch failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "history unavailable").into_response()
        }
    }
}

/// Wrap raw payloads in the wire envelope clients parse.
fn history_response(payloads: Vec<String>) -> HistoryResponse {
    HistoryResponse {
        messages: payloads.into_iter().map(|message| HistoryEntry { message }).collect(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}
