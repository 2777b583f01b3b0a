//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod attribution;
pub mod clicks;
pub mod health;
pub mod stats;

pub use attribution::attribution_handler;
pub use clicks::record_click_handler;
pub use health::health_handler;
pub use stats::stats_handler;
