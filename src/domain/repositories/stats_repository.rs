//! Repository trait for per-link click statistics.

use crate::domain::entities::{ClickIncrement, LinkStatistics};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Storage contract for aggregate click statistics.
///
/// Implementations must apply each [`ClickIncrement`] as one atomic unit:
/// the total, the device bucket and the daily bucket move together, and no
/// interleaving of concurrent increments on the same link may lose an update.
/// Increments must use the backend's own atomic primitive (an upsert, a
/// transaction, an atomic hash increment or a per-key lock), never a
/// read-then-write from the caller.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisStatsRepository`] - Redis
/// - [`crate::infrastructure::persistence::MemoryStatsRepository`] - In-process
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Applies one click to the link's counters, creating the record if absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the backend cannot be reached
    /// and [`AppError::Internal`] on other storage errors.
    async fn increment(&self, increment: ClickIncrement) -> Result<(), AppError>;

    /// Reads the statistics of one link.
    ///
    /// `daily_clicks` holds the days on or after `since`, in ascending order.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LinkStatistics))` if the link has recorded clicks
    /// - `Ok(None)` if nothing was ever recorded for it
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on backend
    /// failures.
    async fn find_by_short_url(
        &self,
        short_url: &str,
        since: NaiveDate,
    ) -> Result<Option<LinkStatistics>, AppError>;

    /// Checks that the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}
