//! Application layer services implementing the statistics contract.
//!
//! Services consume the repository trait and give HTTP handlers and library
//! callers a single entry point.
//!
//! # Available Services
//!
//! - [`services::stats_service::StatsService`] - Statistics reads and click recording
//! - [`services::click_recorder::ClickRecorder`] - Non-blocking click queue handle

pub mod services;
