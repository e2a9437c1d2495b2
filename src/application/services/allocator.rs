//! Short code allocation.
//!
//! Random codes are generated and checked against the live store until a free
//! one is found, up to a configurable attempt cap. Custom aliases go through
//! the same availability check because both live in the `short_code`
//! namespace.
//!
//! The availability check is advisory: two writers can both see a code as
//! free. The store's unique constraint decides, and
//! [`crate::application::services::LinkService`] retries on
//! [`AppError::DuplicateCode`].

use std::sync::Arc;

use tracing::debug;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, validate_alias_format};
use crate::utils::retry::retry_transient;

/// Tuning knobs for code allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationSettings {
    /// Length of generated codes.
    pub code_length: usize,
    /// Maximum candidates tried per allocation, and maximum
    /// allocate-and-insert rounds per create.
    pub max_attempts: usize,
    /// Extra attempts for store calls failing with a transient error.
    pub store_retry_attempts: usize,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: 100,
            store_retry_attempts: 2,
        }
    }
}

/// Produces unique short codes and vets custom aliases.
pub struct CodeAllocator<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    settings: AllocationSettings,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    pub fn new(repository: Arc<L>, settings: AllocationSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> AllocationSettings {
        self.settings
    }

    /// Returns true if no stored link, active or inactive, uses `code`.
    ///
    /// Always reads the live store; the comparison is case-sensitive.
    pub async fn is_code_free(&self, code: &str) -> Result<bool, AppError> {
        let exists = retry_transient(self.settings.store_retry_attempts, || {
            self.repository.code_exists(code)
        })
        .await?;

        Ok(!exists)
    }

    /// Generates a code that is free at the time of the check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Exhausted`] if `max_attempts` candidates were all
    /// taken. Store errors are propagated.
    pub async fn allocate(&self) -> Result<String, AppError> {
        for attempt in 1..=self.settings.max_attempts {
            let candidate = generate_code(self.settings.code_length);

            if self.is_code_free(&candidate).await? {
                return Ok(candidate);
            }

            metrics::counter!("code_collisions_total").increment(1);
            debug!(attempt, code = %candidate, "Generated code already in use");
        }

        tracing::error!(
            attempts = self.settings.max_attempts,
            code_length = self.settings.code_length,
            "Short code allocation exhausted"
        );

        Err(AppError::Exhausted {
            attempts: self.settings.max_attempts,
        })
    }

    /// Checks that `alias` is well-formed and not yet used as a code.
    ///
    /// # Errors
    ///
    /// - [`AppError::AliasInvalid`] for empty, over-long or malformed aliases
    /// - [`AppError::AliasTaken`] if any link already uses it as its code
    pub async fn validate_alias(&self, alias: &str) -> Result<(), AppError> {
        validate_alias_format(alias)?;

        if !self.is_code_free(alias).await? {
            return Err(AppError::alias_taken(alias));
        }

        Ok(())
    }
}
