//! Short code resolution with asynchronous click counting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub link_id: i64,
    pub original_url: String,
    pub short_code: String,
    /// Click count read before this resolution's increment is applied.
    pub click_count: i64,
}

impl From<&Link> for Resolution {
    fn from(link: &Link) -> Self {
        Self {
            link_id: link.id,
            original_url: link.original_url.clone(),
            short_code: link.short_code.clone(),
            click_count: link.click_count,
        }
    }
}

/// Resolves short codes to target URLs.
///
/// Each successful resolution enqueues a [`ClickEvent`] for the background
/// click worker. The queue write never blocks the caller and its failure
/// never fails the resolution: when the queue is full or closed the click is
/// dropped and counted.
pub struct Resolver<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    click_sender: mpsc::Sender<ClickEvent>,
    dropped_clicks: AtomicU64,
}

impl<L: LinkRepository + ?Sized> Resolver<L> {
    pub fn new(repository: Arc<L>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            repository,
            click_sender,
            dropped_clicks: AtomicU64::new(0),
        }
    }

    /// Looks up `code` and returns its target.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link uses the code
    /// - [`AppError::Inactive`] if the link is deactivated
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        let Some(link) = self.repository.find_by_code(code).await? else {
            metrics::counter!("resolutions_total", "outcome" => "not_found").increment(1);
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        };

        if !link.is_active {
            metrics::counter!("resolutions_total", "outcome" => "inactive").increment(1);
            return Err(AppError::Inactive {
                code: link.short_code,
            });
        }

        metrics::counter!("resolutions_total", "outcome" => "ok").increment(1);
        self.enqueue_click(ClickEvent::new(link.id, link.short_code.clone()));

        Ok(Resolution::from(&link))
    }

    /// Returns true if the click worker has stopped receiving events.
    pub fn is_click_queue_closed(&self) -> bool {
        self.click_sender.is_closed()
    }

    /// Remaining free slots in the click queue.
    pub fn click_queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }

    /// Clicks dropped because the queue was full or closed.
    pub fn dropped_clicks(&self) -> u64 {
        self.dropped_clicks.load(Ordering::Relaxed)
    }

    /// Hands a click to the worker without waiting.
    ///
    /// The queue capacity bounds pending clicks; anything beyond it is dropped.
    fn enqueue_click(&self, event: ClickEvent) {
        let (event, reason) = match self.click_sender.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => (event, "full"),
            Err(TrySendError::Closed(event)) => (event, "closed"),
        };

        self.dropped_clicks.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_dropped_total", "reason" => reason).increment(1);
        warn!(
            link_id = event.link_id,
            code = %event.code,
            reason,
            "Click queue unavailable, click dropped"
        );
    }
}
