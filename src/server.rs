//! HTTP server initialization and runtime setup.
//!
//! Handles backend connections, worker spawning, and Axum server lifecycle.

use crate::application::services::{ClickRecorder, StatsService};
use crate::config::{Config, StorageBackend};
use crate::domain::click_worker::{ClickWorkerOptions, run_click_worker};
use crate::domain::repositories::StatsRepository;
use crate::infrastructure::persistence::{
    MemoryStatsRepository, PgStatsRepository, RedisStatsRepository,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::short_url::ShortUrlExtractor;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;

/// How long the click worker may take to drain the queue on shutdown.
const DRAIN_TIMEOUT_SECS: u64 = 30;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Statistics backend (PostgreSQL with migrations, Redis, or memory)
/// - Click queue and background worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the server stops accepting requests, the click queue is
/// closed and the worker finishes every queued click before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Backend connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    let (recorder, click_rx) =
        ClickRecorder::channel(config.click_queue_capacity, config.stats_utc_offset);

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        ClickWorkerOptions {
            concurrency: config.click_worker_concurrency,
            retry_attempts: config.click_retry_attempts,
        },
    ));

    let stats_service = Arc::new(
        StatsService::new(repository, recorder)
            .with_default_offset_days(config.default_offset_days),
    );
    let extractor = Arc::new(ShortUrlExtractor::new(&config.og_hostname));
    let state = AppState::new(stats_service, extractor);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    // The router owns the last click sender; it is dropped when serving ends.
    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining click queue");

    match timeout(Duration::from_secs(DRAIN_TIMEOUT_SECS), worker).await {
        Ok(Ok(())) => tracing::info!("Click queue drained"),
        Ok(Err(e)) => tracing::error!("Click worker terminated abnormally: {}", e),
        Err(_) => tracing::error!(
            "Click queue drain timed out after {} seconds, pending clicks are lost",
            DRAIN_TIMEOUT_SECS
        ),
    }

    Ok(())
}

/// Connects the configured statistics backend.
async fn build_repository(config: &Config) -> Result<Arc<dyn StatsRepository>> {
    let repository: Arc<dyn StatsRepository> = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(PgStatsRepository::new(Arc::new(pool)))
        }
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis backend")?;

            Arc::new(
                RedisStatsRepository::connect(url)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory statistics, data is lost on restart");
            Arc::new(MemoryStatsRepository::new())
        }
    };

    tracing::info!(backend = repository.backend_name(), "Statistics backend ready");
    Ok(repository)
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
