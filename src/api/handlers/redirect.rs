//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::link_url::redirect_target;

/// Redirects a short key to its original URL and counts the click.
///
/// # Endpoint
///
/// `GET /{short_key}`
///
/// Responds with 302 Found. Stored URLs without a scheme are sent to
/// `https://`.
///
/// # Errors
///
/// - 404 Not Found if the short key doesn't exist
/// - 400 Bad Request if the stored URL is not a valid `Location` value
pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve_and_count(&short_key).await?;

    let location = redirect_target(&link.original_url);
    let location = HeaderValue::try_from(location.as_str()).map_err(|e| {
        warn!("Cannot redirect {} to {:?}: {}", short_key, location, e);
        AppError::bad_request(
            "Stored URL cannot be redirected to",
            json!({ "shortKey": short_key }),
        )
    })?;

    info!("Redirecting {} -> {:?}", short_key, location);

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
