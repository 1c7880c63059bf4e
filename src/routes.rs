//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_key}` - Short link redirect, counts the click
//! - `GET  /health`      - Health check
//! - `/api/*`            - JSON link API
//!
//! `/health` is matched before `/{short_key}`. Generated keys skip `health`
//! (see [`crate::application::services::link_service::is_reserved_key`]).

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/{short_key}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::link_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Wraps [`app_router`] so trailing slashes are trimmed before routing.
///
/// `/api/links/` reaches the same handler as `/api/links`.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_router(state))
}
