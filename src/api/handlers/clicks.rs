//! Handler for click ingestion.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::clicks::{ClickAccepted, ClickRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Records one click for a short link.
///
/// # Endpoint
///
/// `POST /api/clicks`
///
/// # Request Body
///
/// ```json
/// {
///   "short_url": "my-url",
///   "device": "mobile",       // optional
///   "user_agent": "Mozilla/5.0 ..."  // optional, used when device is absent
/// }
/// ```
///
/// # Response
///
/// 202 Accepted as soon as the click is queued. Persistence happens in the
/// background; a full queue drops the click without failing the request.
///
/// # Errors
///
/// Returns 400 Bad Request if `short_url` fails validation.
pub async fn record_click_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClickRequest>,
) -> Result<(StatusCode, Json<ClickAccepted>), AppError> {
    payload.validate()?;

    let device = payload.device_type();
    state
        .stats_service
        .record_click(&payload.short_url, device);

    Ok((
        StatusCode::ACCEPTED,
        Json(ClickAccepted {
            short_url: payload.short_url,
            device,
        }),
    ))
}
