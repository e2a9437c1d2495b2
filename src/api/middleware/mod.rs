//! HTTP middleware for request processing and protection.
//!
//! Provides rate limiting, per-request deadlines, and observability middleware.

pub mod deadline;
pub mod rate_limit;
pub mod tracing;

pub use deadline::RequestDeadline;
