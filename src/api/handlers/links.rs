//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{
    ClickCountResponse, CreateLinkRequest, LinkListResponse, LinkResponse, PaginationMeta,
    UpdateLinkRequest,
};
use crate::api::dto::pagination::PaginationParams;
use crate::api::middleware::RequestDeadline;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::deadline::with_deadline;

fn to_response(state: &AppState, link: crate::domain::entities::Link) -> LinkResponse {
    let short_url = state.short_url(&link.short_code);
    LinkResponse::new(link, short_url)
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page", "custom_alias": "promo" }
/// ```
///
/// `custom_alias` is optional; without it a random code is allocated.
///
/// # Responses
///
/// - **201 Created** with the link
/// - **400** `validation_error` / `alias_invalid`
/// - **409** `alias_taken`
/// - **500** `allocation_exhausted`
pub async fn create_link_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = with_deadline(
        deadline,
        state
            .link_service
            .create_link(payload.url, payload.custom_alias),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists active links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=25`
pub async fn list_links_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let page = params.resolve()?;

    let result = with_deadline(
        deadline,
        state.link_service.list_links(page.offset, page.limit),
    )
    .await?;

    Ok(Json(LinkListResponse {
        pagination: PaginationMeta::new(page.page, page.page_size, result.total),
        items: result
            .items
            .into_iter()
            .map(|link| to_response(&state, link))
            .collect(),
    }))
}

/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = with_deadline(deadline, state.link_service.get_link(id)).await?;
    Ok(Json(to_response(&state, link)))
}

/// `GET /api/codes/{code}`
///
/// Returns the link for a short code whether or not it is active.
pub async fn get_link_by_code_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = with_deadline(deadline, state.link_service.get_link_by_code(&code)).await?;
    Ok(Json(to_response(&state, link)))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/new", "custom_alias": null, "is_active": false }
/// ```
///
/// Setting `custom_alias` to a string moves the short code to it; `null`
/// clears the alias and keeps the current code.
pub async fn update_link_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = with_deadline(
        deadline,
        state.link_service.update_link(id, payload.into()),
    )
    .await?;

    Ok(Json(to_response(&state, link)))
}

/// `DELETE /api/links/{id}` → 204, freeing the short code.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    with_deadline(deadline, state.link_service.delete_link(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/links/{id}/clicks`
///
/// Increments the click counter directly, bypassing the click queue.
pub async fn increment_clicks_handler(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<i64>,
) -> Result<Json<ClickCountResponse>, AppError> {
    let click_count = with_deadline(deadline, state.link_service.increment_clicks(id)).await?;
    Ok(Json(ClickCountResponse { id, click_count }))
}
