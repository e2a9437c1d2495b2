//! Handler for resolving a code without redirecting.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::resolve::ResolveResponse;
use crate::api::middleware::RequestDeadline;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::deadline::with_deadline;

/// `GET /api/resolve/{code}`
///
/// Same semantics as the redirect, including the click increment, but
/// returns the target as JSON.
pub async fn resolve_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(code): Path<String>,
) -> Result<Json<ResolveResponse>, AppError> {
    let resolution = with_deadline(deadline, state.resolver.resolve(&code)).await?;
    Ok(Json(resolution.into()))
}
