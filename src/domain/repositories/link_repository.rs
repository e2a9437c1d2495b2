//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the link store.
///
/// The store is the single source of truth for code uniqueness. Implementations
/// must reject a write that would duplicate a `short_code` (or a non-null
/// `custom_alias`) atomically, at the point of commit, with
/// [`AppError::DuplicateCode`]. Click increments must be atomic.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// Transient connection failures are reported as [`AppError::StoreUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code or alias is
    /// already stored.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its numeric id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by its short code (case-sensitive, active or not).
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if any link, active or inactive, uses `code`.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists active links, newest first.
    async fn list_active(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Counts active links.
    async fn count_active(&self) -> Result<i64, AppError>;

    /// Partially updates a link.
    ///
    /// Returns `Ok(None)` if no link has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the patch moves the link onto a
    /// code that is already stored.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Option<Link>, AppError>;

    /// Hard-deletes a link, freeing its code.
    ///
    /// Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Atomically adds one to `click_count`.
    ///
    /// Returns the new count, or `Ok(None)` if the link no longer exists.
    async fn increment_click_count(&self, id: i64) -> Result<Option<i64>, AppError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
