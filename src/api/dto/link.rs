//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::LinkUpdate;
use crate::domain::entities::Link;

/// Request body for `POST /api/links`.
///
/// The alias is checked by the link service rather than here, so that
/// malformed aliases are reported as `alias_invalid`. URL shape and length
/// are checked on the trimmed value by the service as well.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    #[serde(default)]
    pub custom_alias: Option<String>,
}

/// Request body for `PATCH /api/links/{id}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `custom_alias` semantics
///
/// - **Absent** → leave alias and code unchanged
/// - **`null`** → clear the alias, keep the current short code
/// - **String** → set the alias and move the short code to it
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub custom_alias: Option<Option<String>>,

    pub is_active: Option<bool>,
}

impl From<UpdateLinkRequest> for LinkUpdate {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkUpdate {
            original_url: req.url,
            custom_alias: req.custom_alias,
            is_active: req.is_active,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
    pub is_active: bool,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            short_url,
            custom_alias: link.custom_alias,
            created_at: link.created_at,
            click_count: link.click_count,
            is_active: link.is_active,
        }
    }
}

/// Paginated list of active links.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let size = i64::from(page_size.max(1));
        Self {
            page,
            page_size,
            total_items,
            total_pages: (total_items + size - 1) / size,
        }
    }
}

/// Response for `POST /api/links/{id}/clicks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickCountResponse {
    pub id: i64,
    pub click_count: i64,
}
