//! HTTP adapters - REST API implementations.

pub mod chat;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub use chat::{chat_router, ChatAppState};

/// GET /health - Liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Every route the service exposes, with state applied.
pub fn api_router(state: ChatAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(chat_router())
        .with_state(state)
}
