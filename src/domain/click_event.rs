//! Click event model for asynchronous click recording.

use chrono::{DateTime, FixedOffset};

use crate::domain::entities::{ClickIncrement, DeviceType};

/// An in-memory click waiting in the recording queue.
///
/// Created on the click-serving path and consumed by
/// [`crate::domain::click_worker::run_click_worker`]. The timestamp already
/// carries the service UTC offset, so the calendar day a click is counted
/// under is fixed when it happens, not when the worker gets to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub short_url: String,
    pub device: DeviceType,
    pub clicked_at: DateTime<FixedOffset>,
}

impl ClickEvent {
    /// Creates a new click event.
    pub fn new(short_url: String, device: DeviceType, clicked_at: DateTime<FixedOffset>) -> Self {
        Self {
            short_url,
            device,
            clicked_at,
        }
    }

    /// Converts the event into the counter deltas applied by the repository.
    pub fn increment(&self) -> ClickIncrement {
        ClickIncrement::new(
            self.short_url.clone(),
            self.device,
            self.clicked_at.date_naive(),
        )
    }
}
