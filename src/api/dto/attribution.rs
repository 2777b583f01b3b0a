//! DTOs for referrer attribution.

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /api/attribution`.
#[derive(Debug, Deserialize)]
pub struct AttributionQuery {
    /// Referrer URL to attribute.
    pub url: String,
}

/// Short link identifier found in the referrer, if any.
#[derive(Debug, Serialize)]
pub struct AttributionResponse {
    pub short_url: Option<String>,
}
