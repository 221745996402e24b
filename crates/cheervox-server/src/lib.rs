//! cheervox server library logic.

pub mod api;
pub mod bridge;
pub mod config;
pub mod middleware;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use bridge::Bridge;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The chat-to-assistant bridge.
    pub bridge: Arc<Bridge>,
    /// Shared secret expected on assistant webhooks, if any.
    pub webhook_secret: Option<String>,
}

/// Maximum request body size (256 KiB).
const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let webhook_routes = Router::new()
        .route(
            "/api/assistant/events",
            post(api::assistant_events_handler),
        )
        .layer(axum::middleware::from_fn(
            middleware::webhook_secret_middleware,
        ));

    Router::new()
        .route("/health", get(api::health))
        .route(
            "/api/config",
            get(api::get_config_handler).put(api::update_config_handler),
        )
        .route("/api/status", get(api::status_handler))
        .merge(webhook_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
