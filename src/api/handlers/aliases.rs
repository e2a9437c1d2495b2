//! Handler for alias availability checks.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::alias::AliasAvailabilityResponse;
use crate::api::middleware::RequestDeadline;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::deadline::with_deadline;

/// `GET /api/aliases/{alias}`
///
/// Malformed or reserved aliases are reported as unavailable rather than
/// rejected.
pub async fn alias_availability_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(alias): Path<String>,
) -> Result<Json<AliasAvailabilityResponse>, AppError> {
    let is_available =
        with_deadline(deadline, state.link_service.check_alias_available(&alias)).await?;

    Ok(Json(AliasAvailabilityResponse {
        alias,
        is_available,
    }))
}
