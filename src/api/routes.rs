//! API route configuration.

use crate::api::handlers::{create_link_handler, get_link_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /links`              - Create (or reuse) a short link
/// - `GET  /links/{short_key}`  - Look up a link without counting a click
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/links/{short_key}", get(get_link_handler))
}
