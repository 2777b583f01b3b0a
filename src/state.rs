//! Shared application state for request handlers.

use std::sync::Arc;

use crate::application::services::{ClickRecorder, StatsService};
use crate::utils::short_url::ShortUrlExtractor;

/// Application state injected into every handler.
///
/// Cheap to clone: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub stats_service: Arc<StatsService>,
    pub extractor: Arc<ShortUrlExtractor>,
}

impl AppState {
    pub fn new(stats_service: Arc<StatsService>, extractor: Arc<ShortUrlExtractor>) -> Self {
        Self {
            stats_service,
            extractor,
        }
    }

    /// Producer side of the click queue.
    pub fn click_recorder(&self) -> &ClickRecorder {
        self.stats_service.recorder()
    }
}
