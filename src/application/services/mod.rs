//! Business logic services for the application layer.

pub mod click_recorder;
pub mod stats_service;

pub use click_recorder::{ClickRecorder, DispatchError};
pub use stats_service::StatsService;
