//! Per-request deadline extraction.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's deadline in milliseconds.
pub const DEADLINE_HEADER: &str = "x-request-timeout-ms";

/// Time budget for the store work of one request.
///
/// Taken from the `X-Request-Timeout-Ms` header when present, capped at
/// [`AppState::max_request_timeout`]; otherwise [`AppState::request_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadline(pub Duration);

impl FromRequestParts<AppState> for RequestDeadline {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(DEADLINE_HEADER) else {
            return Ok(Self(state.request_timeout));
        };

        let millis = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .ok_or_else(|| {
                AppError::bad_request(
                    "Invalid request timeout header",
                    json!({ "header": DEADLINE_HEADER, "expected": "positive integer (ms)" }),
                )
            })?;

        Ok(Self(Duration::from_millis(millis).min(state.max_request_timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::AllocationSettings;
    use crate::infrastructure::persistence::MemoryLinkRepository;
    use axum::http::Request;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn state() -> AppState {
        let (tx, _rx) = mpsc::channel(10);
        AppState::new(
            Arc::new(MemoryLinkRepository::new()),
            tx,
            AllocationSettings::default(),
            "http://localhost:3000",
        )
        .with_timeouts(Duration::from_millis(1_000), Duration::from_millis(3_000))
    }

    async fn extract(header: Option<&str>) -> Result<RequestDeadline, AppError> {
        let mut builder = Request::builder().uri("/api/links");
        if let Some(value) = header {
            builder = builder.header(DEADLINE_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        RequestDeadline::from_request_parts(&mut parts, &state()).await
    }

    #[tokio::test]
    async fn test_default_when_header_missing() {
        assert_eq!(extract(None).await.unwrap().0, Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn test_header_value_used() {
        assert_eq!(extract(Some("250")).await.unwrap().0, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_header_capped_at_max() {
        assert_eq!(extract(Some("60000")).await.unwrap().0, Duration::from_millis(3_000));
    }

    #[tokio::test]
    async fn test_invalid_header_rejected() {
        assert!(matches!(extract(Some("soon")).await, Err(AppError::Validation { .. })));
        assert!(matches!(extract(Some("0")).await, Err(AppError::Validation { .. })));
    }
}
