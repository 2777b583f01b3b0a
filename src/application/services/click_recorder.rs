//! Fire-and-forget handle for recording clicks.

use chrono::{FixedOffset, Utc};
use tokio::sync::mpsc;
use tracing::{trace, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::DeviceType;

/// Reasons a click could not be handed to the background worker.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("click queue is full")]
    QueueFull,

    #[error("click queue is closed")]
    QueueClosed,
}

impl DispatchError {
    fn as_label(&self) -> &'static str {
        match self {
            DispatchError::QueueFull => "queue_full",
            DispatchError::QueueClosed => "queue_closed",
        }
    }
}

/// Enqueues clicks for [`crate::domain::click_worker::run_click_worker`].
///
/// Recording never waits for storage and never fails from the caller's point
/// of view: when the bounded queue is full or closed the click is dropped,
/// logged and counted in `clicks_dropped_total`.
#[derive(Debug, Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
    utc_offset: FixedOffset,
}

impl ClickRecorder {
    /// Creates a recorder over an existing channel sender.
    pub fn new(sender: mpsc::Sender<ClickEvent>, utc_offset: FixedOffset) -> Self {
        Self { sender, utc_offset }
    }

    /// Creates a bounded queue and returns the recorder with its receiving end.
    pub fn channel(
        capacity: usize,
        utc_offset: FixedOffset,
    ) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender, utc_offset), receiver)
    }

    /// Records one click for `short_url`. Does not block.
    pub fn record(&self, short_url: &str, device: DeviceType) {
        if let Err(e) = self.try_record(short_url, device) {
            metrics::counter!("clicks_dropped_total", "reason" => e.as_label()).increment(1);
            warn!(short_url, device = %device, "Dropping click: {}", e);
        }
    }

    /// Like [`ClickRecorder::record`], but reports why a click was not queued.
    pub fn try_record(&self, short_url: &str, device: DeviceType) -> Result<(), DispatchError> {
        let clicked_at = Utc::now().with_timezone(&self.utc_offset);
        let event = ClickEvent::new(short_url.to_string(), device, clicked_at);

        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DispatchError::QueueClosed,
        })?;

        metrics::counter!("clicks_enqueued_total", "device" => device.as_str()).increment(1);
        trace!(short_url, device = %device, "Click enqueued");
        Ok(())
    }

    /// Whether the worker side of the queue is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently available in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    /// Total size of the queue.
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// UTC offset used to assign clicks to calendar days.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}
