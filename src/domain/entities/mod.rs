//! Core domain entities for click statistics.
//!
//! Entities are plain data structures shared by the repository backends,
//! the application services and the HTTP layer.
//!
//! # Entity Types
//!
//! - [`DeviceType`] - Closed set of client platform categories
//! - [`LinkStatistics`] - Aggregate counters for one short link
//! - [`DailyClickStat`] - Clicks on one calendar day
//! - [`ClickIncrement`] - A single click waiting to be applied to the counters

pub mod device_type;
pub mod link_statistics;

pub use device_type::DeviceType;
pub use link_statistics::{ClickIncrement, DailyClickStat, DeviceClicks, LinkStatistics};
