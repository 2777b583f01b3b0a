//! PostgreSQL implementation of the statistics repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{
    ClickIncrement, DailyClickStat, DeviceClicks, DeviceType, LinkStatistics,
};
use crate::domain::repositories::StatsRepository;
use crate::error::{AppError, map_sqlx_commit_error};

#[derive(Debug, FromRow)]
struct LinkStatisticsRow {
    short_url: String,
    total_clicks: i64,
    desktop_clicks: i64,
    mobile_clicks: i64,
    tablet_clicks: i64,
    other_clicks: i64,
}

#[derive(Debug, FromRow)]
struct DailyClicksRow {
    day: NaiveDate,
    clicks: i64,
}

/// Increment upsert for each device column.
///
/// Column names cannot be bound as parameters, so the statements are fixed
/// per device instead of being built at runtime.
fn upsert_statistics_sql(device: DeviceType) -> &'static str {
    match device {
        DeviceType::Desktop => {
            r#"
            INSERT INTO link_statistics (short_url, total_clicks, desktop_clicks)
            VALUES ($1, 1, 1)
            ON CONFLICT (short_url) DO UPDATE
            SET total_clicks = link_statistics.total_clicks + 1,
                desktop_clicks = link_statistics.desktop_clicks + 1,
                updated_at = NOW()
            "#
        }
        DeviceType::Mobile => {
            r#"
            INSERT INTO link_statistics (short_url, total_clicks, mobile_clicks)
            VALUES ($1, 1, 1)
            ON CONFLICT (short_url) DO UPDATE
            SET total_clicks = link_statistics.total_clicks + 1,
                mobile_clicks = link_statistics.mobile_clicks + 1,
                updated_at = NOW()
            "#
        }
        DeviceType::Tablet => {
            r#"
            INSERT INTO link_statistics (short_url, total_clicks, tablet_clicks)
            VALUES ($1, 1, 1)
            ON CONFLICT (short_url) DO UPDATE
            SET total_clicks = link_statistics.total_clicks + 1,
                tablet_clicks = link_statistics.tablet_clicks + 1,
                updated_at = NOW()
            "#
        }
        DeviceType::Other => {
            r#"
            INSERT INTO link_statistics (short_url, total_clicks, other_clicks)
            VALUES ($1, 1, 1)
            ON CONFLICT (short_url) DO UPDATE
            SET total_clicks = link_statistics.total_clicks + 1,
                other_clicks = link_statistics.other_clicks + 1,
                updated_at = NOW()
            "#
        }
    }
}

/// PostgreSQL repository for aggregate click statistics.
///
/// Each increment runs two `INSERT ... ON CONFLICT DO UPDATE` statements in
/// one transaction. The conflicting row lock serializes concurrent writers
/// on the same link, and the counters are always updated relative to their
/// current stored value, never from a value read by the application.
///
/// A connection failure before `COMMIT` leaves nothing behind and is reported
/// as retryable. A failure during `COMMIT` is reported as
/// [`AppError::Interrupted`] and is not retried.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn increment(&self, increment: ClickIncrement) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(upsert_statistics_sql(increment.device))
            .bind(&increment.short_url)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO daily_link_clicks (short_url, day, clicks)
            VALUES ($1, $2, 1)
            ON CONFLICT (short_url, day) DO UPDATE
            SET clicks = daily_link_clicks.clicks + 1
            "#,
        )
        .bind(&increment.short_url)
        .bind(increment.date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(map_sqlx_commit_error)?;

        Ok(())
    }

    async fn find_by_short_url(
        &self,
        short_url: &str,
        since: NaiveDate,
    ) -> Result<Option<LinkStatistics>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Both reads must see the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, LinkStatisticsRow>(
            r#"
            SELECT short_url, total_clicks, desktop_clicks, mobile_clicks,
                   tablet_clicks, other_clicks
            FROM link_statistics
            WHERE short_url = $1
            "#,
        )
        .bind(short_url)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                tx.commit().await?;
                return Ok(None);
            }
        };

        let daily_rows = sqlx::query_as::<_, DailyClicksRow>(
            r#"
            SELECT day, clicks
            FROM daily_link_clicks
            WHERE short_url = $1 AND day >= $2
            ORDER BY day ASC
            "#,
        )
        .bind(short_url)
        .bind(since)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(LinkStatistics {
            short_url: row.short_url,
            total_clicks: row.total_clicks,
            device_clicks: DeviceClicks {
                desktop: row.desktop_clicks,
                mobile: row.mobile_clicks,
                tablet: row.tablet_clicks,
                other: row.other_clicks,
            },
            daily_clicks: daily_rows
                .into_iter()
                .map(|r| DailyClickStat::new(r.day, r.clicks))
                .collect(),
        }))
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
