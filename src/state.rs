//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::application::services::{AllocationSettings, LinkService, Resolver};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub resolver: Arc<Resolver<dyn LinkRepository>>,
    /// Public origin without trailing slash, e.g. `https://sho.rt`.
    pub base_url: Arc<str>,
    /// Deadline applied when the client sends none.
    pub request_timeout: Duration,
    /// Upper bound for client-requested deadlines.
    pub max_request_timeout: Duration,
}

impl AppState {
    /// Wires services around one link store.
    ///
    /// The click worker consuming `click_sender` is started separately.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: AllocationSettings,
        base_url: &str,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository.clone(), settings)),
            resolver: Arc::new(Resolver::new(repository, click_sender)),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_request_timeout: DEFAULT_MAX_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, default: Duration, max: Duration) -> Self {
        self.request_timeout = default;
        self.max_request_timeout = max.max(default);
        self
    }

    /// Full public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::MemoryLinkRepository;

    fn state(base_url: &str) -> AppState {
        let (tx, _rx) = mpsc::channel(10);
        AppState::new(
            Arc::new(MemoryLinkRepository::new()),
            tx,
            AllocationSettings::default(),
            base_url,
        )
    }

    #[test]
    fn test_short_url_strips_trailing_slash() {
        assert_eq!(state("https://sho.rt/").short_url("abc"), "https://sho.rt/abc");
        assert_eq!(state("https://sho.rt").short_url("abc"), "https://sho.rt/abc");
    }

    #[test]
    fn test_with_timeouts_keeps_max_above_default() {
        let s = state("http://localhost").with_timeouts(
            Duration::from_millis(800),
            Duration::from_millis(200),
        );

        assert_eq!(s.request_timeout, Duration::from_millis(800));
        assert_eq!(s.max_request_timeout, Duration::from_millis(800));
    }
}
