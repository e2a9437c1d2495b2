#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use linkforge::application::services::AllocationSettings;
use linkforge::domain::click_worker::run_click_worker;
use linkforge::AppError;
use linkforge::domain::entities::{Link, LinkPatch, NewLink};
use linkforge::domain::repositories::LinkRepository;
use linkforge::infrastructure::persistence::MemoryLinkRepository;
use linkforge::routes::api_router;
use linkforge::state::AppState;

pub const BASE_URL: &str = "https://sho.rt";

/// In-memory application with a running click worker.
pub struct TestApp {
    pub state: AppState,
    pub repository: Arc<MemoryLinkRepository>,
    pub worker: JoinHandle<()>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(AllocationSettings::default(), 100)
}

pub fn create_test_app_with(settings: AllocationSettings, queue_capacity: usize) -> TestApp {
    let repository = Arc::new(MemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(queue_capacity);

    let worker = tokio::spawn(run_click_worker(rx, repository.clone(), 4, 2));

    let dyn_repository: Arc<dyn LinkRepository> = repository.clone();
    let state = AppState::new(dyn_repository, tx, settings, BASE_URL);

    TestApp {
        state,
        repository,
        worker,
    }
}

pub fn create_test_server(app: &TestApp) -> TestServer {
    TestServer::new(api_router(app.state.clone())).unwrap()
}

/// Polls the store until the link's click count reaches `expected`.
pub async fn wait_for_clicks(repository: &MemoryLinkRepository, id: i64, expected: i64) -> Link {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

    loop {
        let link = repository.find_by_id(id).await.unwrap().unwrap();
        if link.click_count >= expected || tokio::time::Instant::now() >= deadline {
            return link;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Memory store that waits `delay` before every operation.
pub struct SlowLinkRepository {
    pub inner: Arc<MemoryLinkRepository>,
    pub delay: Duration,
}

impl SlowLinkRepository {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl LinkRepository for SlowLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.pause().await;
        self.inner.create(new_link).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.pause().await;
        self.inner.find_by_id(id).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.pause().await;
        self.inner.find_by_code(code).await
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        self.pause().await;
        self.inner.code_exists(code).await
    }

    async fn list_active(&self, offset: i64, limit: i64) -> Result<Vec<Link>, AppError> {
        self.pause().await;
        self.inner.list_active(offset, limit).await
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        self.pause().await;
        self.inner.count_active().await
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Option<Link>, AppError> {
        self.pause().await;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.pause().await;
        self.inner.delete(id).await
    }

    async fn increment_click_count(&self, id: i64) -> Result<Option<i64>, AppError> {
        self.pause().await;
        self.inner.increment_click_count(id).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.pause().await;
        self.inner.ping().await
    }
}

/// Server whose store answers every call after `delay`.
///
/// Returns the underlying memory store for seeding.
pub fn create_slow_test_server(delay: Duration) -> (TestServer, Arc<MemoryLinkRepository>) {
    let inner = Arc::new(MemoryLinkRepository::new());
    let repository: Arc<dyn LinkRepository> = Arc::new(SlowLinkRepository {
        inner: inner.clone(),
        delay,
    });
    let (tx, _rx) = mpsc::channel(16);

    let state = AppState::new(repository, tx, AllocationSettings::default(), BASE_URL)
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(5));

    (TestServer::new(api_router(state)).unwrap(), inner)
}
