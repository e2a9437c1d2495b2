//! Click event model for asynchronous click counting.

/// A resolved click waiting to be counted.
///
/// Sent from the [`crate::application::services::Resolver`] to the background
/// worker via a bounded channel, so the redirect response never waits on the
/// counter write.
///
/// # Usage Flow
///
/// 1. Created by the resolver after an active link is found
/// 2. Sent to the channel (non-blocking)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Applied with an atomic `click_count + 1` in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
}

impl ClickEvent {
    pub fn new(link_id: i64, code: impl Into<String>) -> Self {
        Self {
            link_id,
            code: code.into(),
        }
    }
}
