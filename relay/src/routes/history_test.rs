use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};

use super::*;
use crate::state::test_helpers::test_app_state;

fn auth_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, token.parse().unwrap());
    headers
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_authorization_is_rejected() {
    let state = test_app_state();
    let response = room_shapes(State(state), Path("room1".into()), HeaderMap::new()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_token_is_rejected() {
    // OpenAuth refuses empty identities.
    let state = test_app_state();
    let response = room_shapes(State(state), Path("room1".into()), auth_headers("Bearer ")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn returns_stored_payloads_in_envelope_order() {
    let state = test_app_state();
    state.store.append("room1", r#"{"id":"a"}"#.into()).await.unwrap();
    state.store.append("room1", r#"{"id":"b"}"#.into()).await.unwrap();

    let response =
        room_shapes(State(state), Path("room1".into()), auth_headers("Bearer alice")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let value = body_json(response).await;
    assert_eq!(value["messages"][0]["message"], r#"{"id":"a"}"#);
    assert_eq!(value["messages"][1]["message"], r#"{"id":"b"}"#);
}

#[tokio::test]
async fn unknown_room_returns_an_empty_list() {
    let state = test_app_state();
    let response = room_shapes(State(state), Path("ghost".into()), auth_headers("alice")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value["messages"].as_array().map(Vec::len), Some(0));
}

#[test]
fn bearer_prefix_is_optional() {
    assert_eq!(bearer_token(&auth_headers("Bearer tok")), Some("tok"));
    assert_eq!(bearer_token(&auth_headers("tok")), Some("tok"));
    assert_eq!(bearer_token(&HeaderMap::new()), None);
}
