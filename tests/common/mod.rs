#![allow(dead_code)]

use chrono::FixedOffset;
use link_stats::application::services::{ClickRecorder, StatsService};
use link_stats::domain::click_event::ClickEvent;
use link_stats::domain::click_worker::{ClickWorkerOptions, run_click_worker};
use link_stats::domain::repositories::StatsRepository;
use link_stats::infrastructure::persistence::MemoryStatsRepository;
use link_stats::state::AppState;
use link_stats::utils::short_url::ShortUrlExtractor;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const HOSTNAME: &str = "go.example.com";

pub const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Service over a fresh memory backend, without a worker.
pub fn create_test_service(
    capacity: usize,
) -> (
    StatsService,
    mpsc::Receiver<ClickEvent>,
    Arc<MemoryStatsRepository>,
) {
    let repo = Arc::new(MemoryStatsRepository::new());
    let (recorder, rx) = ClickRecorder::channel(capacity, utc());
    let repository: Arc<dyn StatsRepository> = repo.clone();

    (StatsService::new(repository, recorder), rx, repo)
}

/// Service whose clicks are applied by a running worker.
///
/// Drop the service and await the handle to flush every queued click.
pub fn create_service_with_worker(
    capacity: usize,
) -> (StatsService, JoinHandle<()>, Arc<MemoryStatsRepository>) {
    let (service, rx, repo) = create_test_service(capacity);
    let worker = tokio::spawn(run_click_worker(
        rx,
        repo.clone(),
        ClickWorkerOptions {
            concurrency: 8,
            retry_attempts: 0,
        },
    ));

    (service, worker, repo)
}

/// Handler state over a memory backend. Queued clicks stay in the receiver.
pub fn create_test_state() -> (
    AppState,
    mpsc::Receiver<ClickEvent>,
    Arc<MemoryStatsRepository>,
) {
    let (service, rx, repo) = create_test_service(100);
    let state = AppState::new(Arc::new(service), Arc::new(ShortUrlExtractor::new(HOSTNAME)));

    (state, rx, repo)
}

/// Applies every click currently waiting in the queue.
pub async fn drain_clicks(rx: &mut mpsc::Receiver<ClickEvent>, repo: &MemoryStatsRepository) {
    while let Ok(event) = rx.try_recv() {
        repo.increment(event.increment()).await.unwrap();
    }
}
