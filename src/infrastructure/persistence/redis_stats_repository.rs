//! Redis implementation of the statistics repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

use crate::domain::entities::{
    ClickIncrement, DailyClickStat, DeviceClicks, DeviceType, LinkStatistics,
};
use crate::domain::repositories::StatsRepository;
use crate::error::{AppError, map_redis_write_error};

const TOTAL_FIELD: &str = "total";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Redis repository for aggregate click statistics.
///
/// Each link uses two hashes:
///
/// - `{prefix}counters:{short_url}` with `total` and one field per device
/// - `{prefix}daily:{short_url}` with one `YYYY-MM-DD` field per day
///
/// The namespace comes before the identifier, so no identifier can name
/// another link's hash.
///
/// An increment is a `MULTI`/`EXEC` block of three `HINCRBY` commands, so
/// Redis applies them together and concurrent clicks never overwrite each
/// other. Only a refused connection is reported as retryable: any other
/// connection failure may come after `EXEC` ran. Reads fetch both hashes in
/// one transaction for a consistent view.
pub struct RedisStatsRepository {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisStatsRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis statistics backend");

        let client = Client::open(redis_url).map_err(|e| {
            AppError::unavailable(
                format!("Failed to create Redis client: {}", e),
                serde_json::json!({}),
            )
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            AppError::unavailable(
                format!("Failed to connect to Redis: {}", e),
                serde_json::json!({}),
            )
        })?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("✓ Connected to Redis");

        Ok(Self::with_manager(manager, "stats:"))
    }

    /// Wraps an existing connection manager with the given key prefix.
    pub fn with_manager(client: ConnectionManager, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn counters_key(&self, short_url: &str) -> String {
        counters_key(&self.key_prefix, short_url)
    }

    fn daily_key(&self, short_url: &str) -> String {
        daily_key(&self.key_prefix, short_url)
    }
}

fn counters_key(prefix: &str, short_url: &str) -> String {
    format!("{}counters:{}", prefix, short_url)
}

fn daily_key(prefix: &str, short_url: &str) -> String {
    format!("{}daily:{}", prefix, short_url)
}

fn device_field(device: DeviceType) -> String {
    format!("device:{}", device.as_str())
}

/// Builds statistics from the raw hash contents.
///
/// Unparseable daily fields are skipped with a warning rather than failing
/// the whole read.
fn statistics_from_hashes(
    short_url: &str,
    counters: HashMap<String, i64>,
    daily: HashMap<String, i64>,
    since: NaiveDate,
) -> Option<LinkStatistics> {
    if counters.is_empty() {
        return None;
    }

    let mut device_clicks = DeviceClicks::default();
    for device in DeviceType::ALL {
        *device_clicks.get_mut(device) = counters.get(&device_field(device)).copied().unwrap_or(0);
    }

    let mut daily_clicks: Vec<DailyClickStat> = daily
        .into_iter()
        .filter_map(|(field, clicks)| match NaiveDate::parse_from_str(&field, DATE_FORMAT) {
            Ok(date) => Some(DailyClickStat::new(date, clicks)),
            Err(_) => {
                warn!(short_url, field = %field, "Skipping malformed daily field");
                None
            }
        })
        .filter(|stat| stat.date >= since)
        .collect();
    daily_clicks.sort_by_key(|stat| stat.date);

    Some(LinkStatistics {
        short_url: short_url.to_string(),
        total_clicks: counters.get(TOTAL_FIELD).copied().unwrap_or(0),
        device_clicks,
        daily_clicks,
    })
}

#[async_trait]
impl StatsRepository for RedisStatsRepository {
    async fn increment(&self, increment: ClickIncrement) -> Result<(), AppError> {
        let counters_key = self.counters_key(&increment.short_url);
        let daily_key = self.daily_key(&increment.short_url);
        let mut conn = self.client.clone();

        redis::pipe()
            .atomic()
            .hincr(&counters_key, TOTAL_FIELD, 1)
            .ignore()
            .hincr(&counters_key, device_field(increment.device), 1)
            .ignore()
            .hincr(&daily_key, increment.date.format(DATE_FORMAT).to_string(), 1)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(map_redis_write_error)?;

        debug!(short_url = %increment.short_url, "Redis HINCRBY applied");
        Ok(())
    }

    async fn find_by_short_url(
        &self,
        short_url: &str,
        since: NaiveDate,
    ) -> Result<Option<LinkStatistics>, AppError> {
        let mut conn = self.client.clone();

        let (counters, daily): (HashMap<String, i64>, HashMap<String, i64>) = redis::pipe()
            .atomic()
            .hgetall(self.counters_key(short_url))
            .hgetall(self.daily_key(short_url))
            .query_async(&mut conn)
            .await?;

        Ok(statistics_from_hashes(short_url, counters, daily, since))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
