//! Click statistics read/write service.

use std::sync::Arc;

use chrono::{Days, FixedOffset, NaiveDate, Utc};
use serde_json::json;

use crate::application::services::click_recorder::ClickRecorder;
use crate::domain::entities::{DeviceType, LinkStatistics};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Largest accepted read window, in days.
pub const MAX_OFFSET_DAYS: u32 = 366;

/// Read window used when the caller does not ask for one.
pub const DEFAULT_OFFSET_DAYS: u32 = 7;

/// Service owning the statistics contract.
///
/// Reads go straight to the repository. Writes are handed to a
/// [`ClickRecorder`] and applied later by the click worker, so recording a
/// click never waits on storage.
pub struct StatsService<R: StatsRepository + ?Sized = dyn StatsRepository> {
    repository: Arc<R>,
    recorder: ClickRecorder,
    default_offset_days: u32,
}

impl<R: StatsRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>, recorder: ClickRecorder) -> Self {
        Self {
            repository,
            recorder,
            default_offset_days: DEFAULT_OFFSET_DAYS,
        }
    }

    /// Overrides the window used when `find_by_short_url` gets no offset.
    pub fn with_default_offset_days(mut self, days: u32) -> Self {
        self.default_offset_days = days.clamp(1, MAX_OFFSET_DAYS);
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn recorder(&self) -> &ClickRecorder {
        &self.recorder
    }

    /// Retrieves statistics for `short_url`.
    ///
    /// `daily_clicks` is limited to the last `offset_days` calendar days,
    /// today included, in the service time zone.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LinkStatistics))` if clicks were recorded for the link
    /// - `Ok(None)` if none were
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty identifier or an
    /// `offset_days` outside `1..=366`. Backend failures are propagated.
    pub async fn find_by_short_url(
        &self,
        short_url: &str,
        offset_days: Option<u32>,
    ) -> Result<Option<LinkStatistics>, AppError> {
        if short_url.is_empty() {
            return Err(AppError::bad_request(
                "Short URL must not be empty",
                json!({}),
            ));
        }

        let offset_days = offset_days.unwrap_or(self.default_offset_days);
        let since = window_start(self.today(), offset_days)?;

        self.repository.find_by_short_url(short_url, since).await
    }

    /// Records one click for `short_url`. Never blocks and never fails.
    pub fn record_click(&self, short_url: &str, device: DeviceType) {
        self.recorder.record(short_url, device);
    }

    /// Today's date in the service time zone.
    pub fn today(&self) -> NaiveDate {
        today_in(self.recorder.utc_offset())
    }
}

/// Current calendar day at the given UTC offset.
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// First day of an `offset_days`-long window ending on `today`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if `offset_days` is outside `1..=366`.
pub fn window_start(today: NaiveDate, offset_days: u32) -> Result<NaiveDate, AppError> {
    if !(1..=MAX_OFFSET_DAYS).contains(&offset_days) {
        return Err(AppError::bad_request(
            format!("offset_days must be between 1 and {MAX_OFFSET_DAYS}"),
            json!({ "offset_days": offset_days }),
        ));
    }

    today
        .checked_sub_days(Days::new(u64::from(offset_days - 1)))
        .ok_or_else(|| AppError::bad_request("offset_days out of range", json!({})))
}
