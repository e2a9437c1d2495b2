//! Background worker applying click increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::utils::retry::retry_transient;

/// Drains the click channel and increments counters in the store.
///
/// Up to `concurrency` increments run at once. Transient store failures are
/// retried `retry_attempts` times; a click that still fails is logged and
/// dropped. Returns after the channel closes and in-flight increments finish.
pub async fn run_click_worker<L>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<L>,
    concurrency: usize,
    retry_attempts: usize,
) where
    L: LinkRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            record_click(repository.as_ref(), &event, retry_attempts).await;
        });
    }

    // Wait for in-flight increments before reporting shutdown.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

/// Applies a single click. Returns true if the counter was incremented.
async fn record_click<L>(repository: &L, event: &ClickEvent, retry_attempts: usize) -> bool
where
    L: LinkRepository + ?Sized,
{
    match retry_transient(retry_attempts, || {
        repository.increment_click_count(event.link_id)
    })
    .await
    {
        Ok(Some(count)) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(link_id = event.link_id, code = %event.code, count, "Click recorded");
            true
        }
        Ok(None) => {
            debug!(
                link_id = event.link_id,
                code = %event.code,
                "Link removed before click was recorded"
            );
            false
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!(
                link_id = event.link_id,
                code = %event.code,
                error = %e,
                "Failed to record click"
            );
            false
        }
    }
}
