//! Deadline enforcement for store-bound operations.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Runs `operation` and fails with [`AppError::Timeout`] if it does not
/// complete within `limit`.
///
/// The inner future is dropped on expiry, cancelling any pending store call.
pub async fn with_deadline<T, Fut>(limit: Duration, operation: Fut) -> Result<T, AppError>
where
    Fut: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Operation deadline exceeded");
            Err(AppError::Timeout {
                after_ms: limit.as_millis() as u64,
            })
        }
    }
}
