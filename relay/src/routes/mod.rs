//! Router assembly.
//!
//! Two endpoints: the websocket relay at `/ws` and the room history fetch
//! at `/rooms/{room_id}/shapes`. Everything else about a deployment (static
//! assets, identity service) lives outside this process.

pub mod history;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/rooms/{room_id}/shapes", get(history::room_shapes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
