//! Application error type and its HTTP mapping.
//!
//! Every layer returns [`AppError`]. Handlers propagate it with `?` and axum
//! turns it into a JSON body of the form:
//!
//! ```json
//! { "error": { "code": "alias_taken", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input (URL, pagination, headers).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Alias is empty, too long, contains forbidden characters or is reserved.
    #[error("{message}")]
    AliasInvalid { message: String, details: Value },

    /// Alias already occupies the short code namespace.
    #[error("Alias '{alias}' is already taken")]
    AliasTaken { alias: String },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The short code exists but the link has been deactivated.
    #[error("Short link '{code}' is inactive")]
    Inactive { code: String },

    /// The store rejected a write on a unique constraint.
    ///
    /// Raised when two writers race between the availability check and the
    /// insert. Random-code allocation treats it as a signal to retry.
    #[error("Short code is already in use")]
    DuplicateCode { constraint: Option<String> },

    /// The allocator hit its attempt cap without finding a free code.
    #[error("Failed to allocate a unique short code after {attempts} attempts")]
    Exhausted { attempts: usize },

    /// Transient storage failure; safe for the caller to retry.
    #[error("Link store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The operation did not finish before its deadline.
    #[error("Operation timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn alias_invalid(message: impl Into<String>, details: Value) -> Self {
        Self::AliasInvalid {
            message: message.into(),
            details,
        }
    }

    pub fn alias_taken(alias: impl Into<String>) -> Self {
        Self::AliasTaken {
            alias: alias.into(),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for failures that may succeed when retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::AliasInvalid { .. } => "alias_invalid",
            Self::AliasTaken { .. } => "alias_taken",
            Self::NotFound { .. } => "not_found",
            Self::Inactive { .. } => "inactive",
            Self::DuplicateCode { .. } => "conflict",
            Self::Exhausted { .. } => "allocation_exhausted",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Timeout { .. } => "timeout",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::AliasInvalid { .. } => StatusCode::BAD_REQUEST,
            Self::AliasTaken { .. } | Self::DuplicateCode { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Inactive { .. } => StatusCode::GONE,
            Self::Exhausted { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn details(&self) -> Value {
        match self {
            Self::Validation { details, .. }
            | Self::AliasInvalid { details, .. }
            | Self::NotFound { details, .. }
            | Self::Internal { details, .. } => details.clone(),
            Self::AliasTaken { alias } => json!({ "alias": alias }),
            Self::Inactive { code } => json!({ "code": code }),
            Self::DuplicateCode { constraint } => json!({ "constraint": constraint }),
            Self::Exhausted { attempts } => json!({ "attempts": attempts }),
            Self::StoreUnavailable { .. } => json!({ "retryable": true }),
            Self::Timeout { after_ms } => json!({ "after_ms": after_ms }),
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "Request validation failed",
            serde_json::to_value(&errors).unwrap_or_default(),
        )
    }
}

/// Classifies a database error.
///
/// Unique violations become [`AppError::DuplicateCode`], connection and pool
/// failures become [`AppError::StoreUnavailable`], everything else is internal.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::DuplicateCode {
            constraint: db.constraint().map(str::to_string),
        };
    }

    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => AppError::store_unavailable(e.to_string()),
        other => {
            tracing::error!(error = %other, "Database error");
            AppError::internal("Database error", json!({}))
        }
    }
}
