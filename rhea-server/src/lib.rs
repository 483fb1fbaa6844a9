//! # rhea-server
//!
//! HTTP and WebSocket transport over [`chat_runtime::ChatService`]. Every endpoint takes an optional
//! `?session=<id>` (default `default`); WebSocket clients without one get a fresh session that ends
//! with the connection. Named sessions end with `DELETE /api/session`.

pub mod api;
pub mod ws;

use axum::http::{header, Method};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use api::{characters::*, chat::*, config::*, context::*, events::*, profiles::*, session::*};
pub use api::AppState;

#[derive(Serialize)]
struct Health {
    status: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

/// Builds the router with CORS open to any origin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws::ws_handler))
        .route("/api/chat", post(chat))
        .route("/api/config", get(get_config).put(update_config))
        .route(
            "/api/profiles",
            get(list_profiles).post(create_profile).delete(delete_profile),
        )
        .route("/api/events", get(list_events).post(add_event))
        .route(
            "/api/characters/current",
            get(current_characters).put(select_characters),
        )
        .route("/api/clear", post(clear_conversation))
        .route("/api/context/status", get(context_status))
        .route("/api/context/trim", post(trim_context))
        .route("/api/session", delete(end_session))
        .layer(cors)
        .with_state(state)
}
