//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// The visit is queued for the background click worker; the redirect is sent
/// without waiting for the counter update.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mapping = state.link_service.resolve_url(&code).await?;
    debug!(code = %mapping.short_code, target = %mapping.original_url, "Redirecting");

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, mapping.original_url)],
    ))
}
