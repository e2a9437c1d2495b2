//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::api::middleware::RequestDeadline;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::deadline::with_deadline;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// The resolver queues a click event for the background worker; the
/// redirect is returned without waiting for the counter update.
///
/// # Errors
///
/// - **404 Not Found** if no link uses the code
/// - **410 Gone** if the link is deactivated
pub async fn redirect_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(code): Path<String>,
) -> Result<Redirect, AppError> {
    let resolution = with_deadline(deadline, state.resolver.resolve(&code)).await?;
    Ok(Redirect::temporary(&resolution.original_url))
}
