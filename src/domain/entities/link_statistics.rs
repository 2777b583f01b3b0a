//! Aggregate click statistics for a single short link.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::device_type::DeviceType;

/// Click counters broken down by [`DeviceType`].
///
/// Every device bucket is always present, so serialized output carries all
/// four keys even when they are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClicks {
    pub desktop: i64,
    pub mobile: i64,
    pub tablet: i64,
    pub other: i64,
}

impl DeviceClicks {
    /// Returns the counter for `device`.
    pub fn get(&self, device: DeviceType) -> i64 {
        match device {
            DeviceType::Desktop => self.desktop,
            DeviceType::Mobile => self.mobile,
            DeviceType::Tablet => self.tablet,
            DeviceType::Other => self.other,
        }
    }

    /// Mutable access to the counter for `device`.
    pub fn get_mut(&mut self, device: DeviceType) -> &mut i64 {
        match device {
            DeviceType::Desktop => &mut self.desktop,
            DeviceType::Mobile => &mut self.mobile,
            DeviceType::Tablet => &mut self.tablet,
            DeviceType::Other => &mut self.other,
        }
    }

    /// Sum over all device buckets.
    pub fn total(&self) -> i64 {
        DeviceType::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

/// Number of clicks a link received on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyClickStat {
    pub date: NaiveDate,
    pub clicks: i64,
}

impl DailyClickStat {
    pub fn new(date: NaiveDate, clicks: i64) -> Self {
        Self { date, clicks }
    }
}

/// Aggregate statistics for one short link.
///
/// `daily_clicks` only covers the window requested by the reader, is sorted
/// by ascending date and omits days without clicks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatistics {
    pub short_url: String,
    pub total_clicks: i64,
    pub device_clicks: DeviceClicks,
    pub daily_clicks: Vec<DailyClickStat>,
}

impl LinkStatistics {
    /// Creates an empty record for `short_url`.
    pub fn empty(short_url: impl Into<String>) -> Self {
        Self {
            short_url: short_url.into(),
            total_clicks: 0,
            device_clicks: DeviceClicks::default(),
            daily_clicks: Vec::new(),
        }
    }

    /// Sum of the daily entries present in this snapshot.
    pub fn daily_total(&self) -> i64 {
        self.daily_clicks.iter().map(|d| d.clicks).sum()
    }
}

/// A single click to be applied to a link's counters.
///
/// `date` is the calendar day of the click in the service time zone, fixed
/// when the click happened rather than when it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickIncrement {
    pub short_url: String,
    pub device: DeviceType,
    pub date: NaiveDate,
}

impl ClickIncrement {
    pub fn new(short_url: impl Into<String>, device: DeviceType, date: NaiveDate) -> Self {
        Self {
            short_url: short_url.into(),
            device,
            date,
        }
    }
}
