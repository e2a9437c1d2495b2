//! Link lifecycle service: create, read, update, delete.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::application::services::allocator::{AllocationSettings, CodeAllocator};
use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::validate_alias_format;
use crate::utils::retry::retry_transient;
use crate::utils::url_validator::validate_target_url;

/// Requested changes to a link.
///
/// `custom_alias: Some(None)` clears the alias, `Some(Some(a))` sets it.
#[derive(Debug, Clone, Default)]
pub struct LinkUpdate {
    pub original_url: Option<String>,
    pub custom_alias: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// A page of links with the total count.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub items: Vec<Link>,
    pub total: i64,
}

/// Service for creating and managing shortened links.
///
/// Creation closes the check-then-insert race by trusting the store's unique
/// constraint: if the insert reports [`AppError::DuplicateCode`], a random
/// code is re-allocated and the insert retried, bounded by
/// [`AllocationSettings::max_attempts`].
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    allocator: CodeAllocator<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(repository: Arc<L>, settings: AllocationSettings) -> Self {
        Self {
            allocator: CodeAllocator::new(repository.clone(), settings),
            repository,
        }
    }

    pub fn allocator(&self) -> &CodeAllocator<L> {
        &self.allocator
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Absolute HTTP(S) URL, at most 2000 characters
    /// - `custom_alias` - Optional caller-chosen code
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is invalid
    /// - [`AppError::AliasInvalid`] if the alias is malformed
    /// - [`AppError::AliasTaken`] if the alias is already used, including when
    ///   a concurrent create wins the race
    /// - [`AppError::Exhausted`] if no unique random code could be stored
    pub async fn create_link(
        &self,
        original_url: String,
        custom_alias: Option<String>,
    ) -> Result<Link, AppError> {
        let original_url = validate_target_url(&original_url)?;

        let link = match custom_alias {
            Some(alias) => self.create_with_alias(original_url, alias).await?,
            None => self.create_with_random_code(original_url).await?,
        };

        metrics::counter!("links_created_total").increment(1);
        info!(
            id = link.id,
            code = %link.short_code,
            custom = link.has_custom_alias(),
            "Link created"
        );

        Ok(link)
    }

    async fn create_with_alias(&self, original_url: String, alias: String) -> Result<Link, AppError> {
        self.allocator.validate_alias(&alias).await?;

        let new_link = NewLink {
            original_url,
            short_code: alias.clone(),
            custom_alias: Some(alias.clone()),
        };

        match self.insert(new_link).await {
            Err(AppError::DuplicateCode { .. }) => Err(AppError::alias_taken(alias)),
            other => other,
        }
    }

    async fn create_with_random_code(&self, original_url: String) -> Result<Link, AppError> {
        let max_attempts = self.allocator.settings().max_attempts;

        for attempt in 1..=max_attempts {
            let code = self.allocator.allocate().await?;

            let new_link = NewLink {
                original_url: original_url.clone(),
                short_code: code,
                custom_alias: None,
            };

            match self.insert(new_link).await {
                Err(AppError::DuplicateCode { constraint }) => {
                    metrics::counter!("code_collisions_total").increment(1);
                    warn!(
                        attempt,
                        constraint = constraint.as_deref().unwrap_or("unknown"),
                        "Short code taken by a concurrent insert, retrying"
                    );
                }
                other => return other,
            }
        }

        Err(AppError::Exhausted {
            attempts: max_attempts,
        })
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        retry_transient(self.allocator.settings().store_retry_attempts, || {
            self.repository.create(new_link.clone())
        })
        .await
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Retrieves a link by its short code, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses the code.
    pub async fn get_link_by_code(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Lists active links, newest first.
    pub async fn list_links(&self, offset: i64, limit: i64) -> Result<LinkPage, AppError> {
        let items = self.repository.list_active(offset, limit).await?;
        let total = self.repository.count_active().await?;

        Ok(LinkPage { items, total })
    }

    /// Applies a partial update.
    ///
    /// Setting a new alias moves the link's `short_code` to it, keeping a single
    /// namespace. Clearing the alias keeps the current code.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link has this id
    /// - [`AppError::Validation`] if the new URL is invalid
    /// - [`AppError::AliasInvalid`] / [`AppError::AliasTaken`] for a bad alias
    pub async fn update_link(&self, id: i64, update: LinkUpdate) -> Result<Link, AppError> {
        let existing = self.get_link(id).await?;

        let mut patch = LinkPatch {
            original_url: update
                .original_url
                .as_deref()
                .map(validate_target_url)
                .transpose()?,
            is_active: update.is_active,
            ..Default::default()
        };

        let mut requested_alias = None;
        match update.custom_alias {
            Some(Some(alias)) => {
                if alias != existing.short_code {
                    self.allocator.validate_alias(&alias).await?;
                    patch.short_code = Some(alias.clone());
                } else {
                    validate_alias_format(&alias)?;
                }
                requested_alias = Some(alias.clone());
                patch.custom_alias = Some(Some(alias));
            }
            Some(None) => patch.custom_alias = Some(None),
            None => {}
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        let updated = match self.repository.update(id, patch).await {
            Err(err @ AppError::DuplicateCode { .. }) => {
                return Err(match requested_alias {
                    Some(alias) => AppError::alias_taken(alias),
                    None => err,
                });
            }
            other => other?,
        };

        let link = updated.ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        info!(id, code = %link.short_code, active = link.is_active, "Link updated");

        Ok(link)
    }

    /// Hard-deletes a link. Its code becomes free for future allocations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn delete_link(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        info!(id, "Link deleted");
        Ok(())
    }

    /// Synchronously adds one click and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn increment_clicks(&self, id: i64) -> Result<i64, AppError> {
        self.repository
            .increment_click_count(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Returns true if `alias` is well-formed and not used as any code.
    pub async fn check_alias_available(&self, alias: &str) -> Result<bool, AppError> {
        if validate_alias_format(alias).is_err() {
            return Ok(false);
        }

        self.allocator.is_code_free(alias).await
    }

    /// Checks store connectivity.
    pub async fn store_health(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
