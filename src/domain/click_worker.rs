//! Background worker that applies queued clicks to the statistics backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Tuning knobs for [`run_click_worker`].
#[derive(Debug, Clone, Copy)]
pub struct ClickWorkerOptions {
    /// Maximum number of increments in flight at once.
    pub concurrency: usize,
    /// Retries after the first failed attempt, transient errors only.
    pub retry_attempts: usize,
}

impl Default for ClickWorkerOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retry_attempts: 3,
        }
    }
}

/// Drains the click queue until every sender is dropped.
///
/// Each event is applied through [`StatsRepository::increment`], which is
/// atomic per click, so running several increments for the same link in
/// parallel cannot lose updates. Failures are retried with jittered
/// exponential backoff when transient, then logged and counted; they never
/// reach the code that enqueued the click.
///
/// Returns once the channel is closed and all in-flight increments finished.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    options: ClickWorkerOptions,
) where
    R: StatsRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    info!(
        backend = repository.backend_name(),
        concurrency = options.concurrency,
        "Click worker started"
    );

    while let Some(event) = rx.recv().await {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let repository = repository.clone();
        let retry_attempts = options.retry_attempts;
        tasks.spawn(async move {
            persist_click(repository.as_ref(), &event, retry_attempts).await;
            drop(permit);
        });

        while let Some(result) = tasks.try_join_next() {
            log_task_result(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_task_result(result);
    }

    info!("Click worker stopped, queue drained");
}

async fn persist_click<R>(repository: &R, event: &ClickEvent, retry_attempts: usize)
where
    R: StatsRepository + ?Sized,
{
    let increment = event.increment();
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(retry_attempts);

    let result = RetryIf::spawn(
        strategy,
        || repository.increment(increment.clone()),
        |e: &AppError| {
            if e.is_transient() {
                warn!(short_url = %increment.short_url, "Retrying click increment: {}", e);
                true
            } else {
                false
            }
        },
    )
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("clicks_persisted_total").increment(1);
            debug!(
                short_url = %increment.short_url,
                device = %increment.device,
                date = %increment.date,
                "Click persisted"
            );
        }
        Err(e) => {
            metrics::counter!("click_write_failures_total").increment(1);
            error!(
                short_url = %increment.short_url,
                device = %increment.device,
                "Failed to persist click: {}",
                e
            );
        }
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!("Click task panicked: {}", e);
    }
}
