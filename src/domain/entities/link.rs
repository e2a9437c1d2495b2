//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// Maximum length of a target URL.
pub const MAX_URL_LENGTH: usize = 2000;

/// Maximum length of a stored short code.
pub const MAX_SHORT_CODE_LENGTH: usize = 100;

/// Maximum length of a custom alias.
pub const MAX_ALIAS_LENGTH: usize = 50;

/// A shortened URL with its usage counter.
///
/// `short_code` is unique across the whole store. Random codes and custom
/// aliases share that namespace; when `custom_alias` is set it equals
/// `short_code`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
    pub is_active: bool,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        custom_alias: Option<String>,
        created_at: DateTime<Utc>,
        click_count: i64,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            custom_alias,
            created_at,
            click_count,
            is_active,
        }
    }

    /// Returns true if the short code was chosen by the caller.
    pub fn has_custom_alias(&self) -> bool {
        self.custom_alias.is_some()
    }
}

/// Input data for creating a new link.
///
/// Storage assigns `id`, `created_at`, `click_count = 0` and `is_active = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `custom_alias: Some(None)` clears the alias; `Some(Some(a))` sets it.
/// `short_code` is filled in by the service when a new alias moves the code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub short_code: Option<String>,
    pub custom_alias: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl LinkPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none()
            && self.short_code.is_none()
            && self.custom_alias.is_none()
            && self.is_active.is_none()
    }

    /// Applies the patch to an in-memory link.
    pub fn apply_to(&self, link: &mut Link) {
        if let Some(url) = &self.original_url {
            link.original_url = url.clone();
        }
        if let Some(code) = &self.short_code {
            link.short_code = code.clone();
        }
        if let Some(alias) = &self.custom_alias {
            link.custom_alias = alias.clone();
        }
        if let Some(active) = self.is_active {
            link.is_active = active;
        }
    }
}
