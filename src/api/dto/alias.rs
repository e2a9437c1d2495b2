//! DTO for alias availability checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AliasAvailabilityResponse {
    pub alias: String,
    pub is_available: bool,
}
