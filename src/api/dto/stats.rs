//! DTOs for link statistics.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use super::SHORT_URL_REGEX;

/// Path parameters for `GET /api/stats/{short_url}`.
#[derive(Debug, Deserialize, Validate)]
pub struct StatsPath {
    #[validate(length(min = 1, max = 255))]
    #[validate(regex(path = "*SHORT_URL_REGEX"))]
    pub short_url: String,
}

/// Query parameters for `GET /api/stats/{short_url}`.
///
/// Uses `serde_with` to parse the window from the query string as an integer.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct StatsQueryParams {
    /// Trailing number of calendar days of daily history to return.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset_days: Option<u32>,
}
