//! DTO for the resolve endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::Resolution;

/// Response for `GET /api/resolve/{code}`.
///
/// `click_count` is the value read before this resolution was counted.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub original_url: String,
    pub short_code: String,
    pub click_count: i64,
}

impl From<Resolution> for ResolveResponse {
    fn from(r: Resolution) -> Self {
        Self {
            original_url: r.original_url,
            short_code: r.short_code,
            click_count: r.click_count,
        }
    }
}
