//! In-process statistics repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;

use crate::domain::entities::{
    ClickIncrement, DailyClickStat, DeviceClicks, LinkStatistics,
};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct LinkCounters {
    total: i64,
    devices: DeviceClicks,
    daily: BTreeMap<NaiveDate, i64>,
}

/// Statistics kept in a sharded concurrent map.
///
/// An increment holds the entry guard of its link for the whole update, so
/// writers on the same link are serialized by the shard lock while different
/// links proceed in parallel. Data lives only as long as the process; use it
/// for tests and single-instance deployments.
#[derive(Debug, Default)]
pub struct MemoryStatsRepository {
    links: DashMap<String, LinkCounters>,
}

impl MemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links with at least one recorded click.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl StatsRepository for MemoryStatsRepository {
    async fn increment(&self, increment: ClickIncrement) -> Result<(), AppError> {
        let mut counters = self.links.entry(increment.short_url).or_default();

        counters.total += 1;
        *counters.devices.get_mut(increment.device) += 1;
        *counters.daily.entry(increment.date).or_insert(0) += 1;

        Ok(())
    }

    async fn find_by_short_url(
        &self,
        short_url: &str,
        since: NaiveDate,
    ) -> Result<Option<LinkStatistics>, AppError> {
        let Some(counters) = self.links.get(short_url) else {
            return Ok(None);
        };

        let daily_clicks = counters
            .daily
            .range(since..)
            .map(|(date, clicks)| DailyClickStat::new(*date, *clicks))
            .collect();

        Ok(Some(LinkStatistics {
            short_url: short_url.to_string(),
            total_clicks: counters.total,
            device_clicks: counters.devices,
            daily_clicks,
        }))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
