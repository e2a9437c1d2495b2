//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect
//! - `GET  /health`      - Health check: store and click queue
//! - `/api/*`            - Link management REST API (rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api` (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes outside `/api`: the redirect and the health check.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}

/// All routes without rate limiting or path normalization.
///
/// Does not require connect info, which makes it usable from in-process tests.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(service_routes())
        .nest("/api", api::routes::routes())
        .with_state(state)
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// The rate limiter needs the peer address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api = api::routes::routes();
    let api = if behind_proxy {
        api.layer(rate_limit::proxy_layer())
    } else {
        api.layer(rate_limit::layer())
    };

    let router = Router::new()
        .merge(service_routes())
        .nest("/api", api)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
