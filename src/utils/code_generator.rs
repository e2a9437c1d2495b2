//! Short code generation and alias validation.
//!
//! Random codes are drawn from the 62-character alphanumeric alphabet.
//! Custom aliases share the same namespace, so they are checked here for
//! shape before the allocator checks them for availability.

use std::sync::LazyLock;

use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use serde_json::json;

use crate::domain::entities::MAX_ALIAS_LENGTH;
use crate::error::AppError;

/// Default length of generated codes (62^6 ~ 56.8 billion combinations).
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Characters a generated code may contain.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Codes reserved for service routes.
const RESERVED_ALIASES: &[&str] = &["api", "health", "admin", "static", "favicon.ico", "robots.txt"];

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias regex is valid"));

/// Generates a random short code of `length` characters.
///
/// Each character is an independent uniform draw from [`ALPHABET`] using the
/// thread-local RNG, which is seeded from the operating system.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates the shape of a user-provided alias.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route name (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::AliasInvalid`] if any rule is violated.
pub fn validate_alias_format(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() {
        return Err(AppError::alias_invalid(
            "Custom alias cannot be empty",
            json!({ "provided_length": 0 }),
        ));
    }

    if alias.chars().count() > MAX_ALIAS_LENGTH {
        return Err(AppError::alias_invalid(
            format!("Custom alias must be at most {MAX_ALIAS_LENGTH} characters"),
            json!({ "provided_length": alias.chars().count() }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::alias_invalid(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::alias_invalid(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
