//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::stats::{StatsPath, StatsQueryParams};
use crate::domain::entities::LinkStatistics;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves aggregate statistics for a specific short link.
///
/// # Endpoint
///
/// `GET /api/stats/{short_url}`
///
/// # Query Parameters
///
/// - `offset_days` (optional): Days of daily history to return, today
///   included (default: 7, range: 1..=366)
///
/// # Response
///
/// ```json
/// {
///   "short_url": "my-url",
///   "total_clicks": 3,
///   "device_clicks": { "desktop": 2, "mobile": 1, "tablet": 0, "other": 0 },
///   "daily_clicks": [ { "date": "2024-06-10", "clicks": 3 } ]
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if no click was ever recorded for the link.
/// Returns 400 Bad Request if the identifier is malformed or `offset_days`
/// is not an integer in range.
/// Returns 503 Service Unavailable if the backend cannot be reached.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(path): Path<StatsPath>,
    query: Result<Query<StatsQueryParams>, QueryRejection>,
) -> Result<Json<LinkStatistics>, AppError> {
    path.validate()?;
    let Query(params) = query?;
    let short_url = path.short_url;

    let stats = state
        .stats_service
        .find_by_short_url(&short_url, params.offset_days)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                "No statistics for this link",
                json!({ "short_url": short_url }),
            )
        })?;

    Ok(Json(stats))
}
