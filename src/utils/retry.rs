//! Bounded retries for transient store failures.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::error::AppError;

/// Runs `operation`, retrying up to `retries` more times while it fails with
/// a retryable error ([`AppError::is_retryable`]).
///
/// Backoff is exponential with jitter: roughly 20ms, 40ms, 80ms, capped at
/// 500ms. Non-retryable errors are returned immediately.
pub async fn retry_transient<T, F, Fut>(retries: usize, mut operation: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(retries);

    RetryIf::spawn(strategy, || operation(), |e: &AppError| {
        let retry = e.is_retryable();
        if retry {
            warn!(error = %e, "Transient store failure, retrying");
        }
        retry
    })
    .await
}
