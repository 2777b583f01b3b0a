//! DTOs for click ingestion.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::SHORT_URL_REGEX;
use crate::domain::entities::DeviceType;

/// A click reported by the redirect path.
///
/// `device` takes precedence over `user_agent`. With neither, the click is
/// counted as [`DeviceType::Other`].
#[derive(Debug, Deserialize, Validate)]
pub struct ClickRequest {
    #[validate(length(min = 1, max = 255))]
    #[validate(regex(path = "*SHORT_URL_REGEX"))]
    pub short_url: String,

    /// Device label (`desktop`, `mobile`, `tablet`, `other`).
    pub device: Option<String>,

    /// Raw `User-Agent` header of the visitor.
    pub user_agent: Option<String>,
}

impl ClickRequest {
    /// Resolves the device bucket for this click.
    pub fn device_type(&self) -> DeviceType {
        match &self.device {
            Some(label) => DeviceType::from_label(label),
            None => DeviceType::from_user_agent(self.user_agent.as_deref()),
        }
    }
}

/// Acknowledgement for an accepted click.
#[derive(Debug, Serialize)]
pub struct ClickAccepted {
    pub short_url: String,
    pub device: DeviceType,
}
