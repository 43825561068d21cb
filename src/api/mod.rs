//! HTTP API surface.
//!
//! Routes mirror the tool's four operations (scrape, analyze, search, score)
//! plus settings and state management.

pub mod errors;
pub mod handlers;
pub mod models;

use axum::routing::{get, post};
use axum::Router;

pub use handlers::{AppState, Session};

/// Builds the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/scrape", post(handlers::scrape))
        .route("/api/analyze", post(handlers::analyze))
        .route(
            "/api/search",
            post(handlers::search).put(handlers::search_batch),
        )
        .route("/api/score", post(handlers::score))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/api/reset", post(handlers::reset))
        .with_state(state)
}
