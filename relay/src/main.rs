mod auth;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use crate::auth::{AuthProvider, OpenAuth, StaticTokenAuth};
use crate::store::MemoryStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()
        .expect("invalid PORT");

    let auth: Arc<dyn AuthProvider> = match std::env::var("RELAY_TOKEN") {
        Ok(token) => Arc::new(StaticTokenAuth::new(token)),
        Err(_) => {
            tracing::warn!("RELAY_TOKEN not set — accepting any non-empty token");
            Arc::new(OpenAuth)
        }
    };

    let state = state::AppState::new(auth, Arc::new(MemoryStore::new()));

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "relay listening");
    axum::serve(listener, app).await.expect("server failed");
}
