pub mod chat;
pub mod state;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use state::AppState;

/// Build the service router with all routes and the CORS layer.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(chat::health))
        .route("/chat", post(chat::chat))
        .route("/summarize", post(chat::summarize))
        .route("/clear-memory", get(chat::clear_memory))
        .layer(cors)
        .with_state(state)
}
