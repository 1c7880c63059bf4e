//! Handlers for link creation and lookup.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkDto};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, or returns the existing one for a known URL.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/very/long/url", "len": 6 }
/// ```
///
/// # Response
///
/// ```json
/// { "shortKey": "AbCdEf", "originalUrl": "https://example.com/very/long/url", "clickCount": 0 }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not a valid request, the URL is
/// longer than 128 characters or fails the validity check, or `len` is
/// outside 3..=12.
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<Json<LinkDto>, AppError> {
    let Json(payload) = payload?;
    tracing::info!("POST /api/links - URL: {}, Length: {}", payload.url, payload.len);

    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(&payload.url, payload.len)
        .await?;

    Ok(Json(link.into()))
}

/// Returns the link stored under a short key without counting a click.
///
/// # Endpoint
///
/// `GET /api/links/{short_key}`
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(short_key): Path<String>,
) -> Result<Json<LinkDto>, AppError> {
    let link = state.link_service.get_link(&short_key).await?;

    Ok(Json(link.into()))
}
