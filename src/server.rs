//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::models::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: ServerConfig) -> AppState {
    AppState {
        config: Arc::new(config),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// Each image endpoint carries its own body limit; `/compose` accepts
/// larger uploads since it receives the whole tile set in one request.
pub fn build_router(state: AppState) -> Router {
    let limits = &state.config.limits;
    let request_limit = DefaultBodyLimit::max(limits.request_bytes());
    let compose_limit = DefaultBodyLimit::max(limits.compose_request_bytes());

    Router::new()
        .route(
            "/resize",
            post(api::handle_resize).layer(request_limit.clone()),
        )
        .route("/jpeg", post(api::handle_jpeg).layer(request_limit))
        .route("/compose", post(api::handle_compose).layer(compose_limit))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
