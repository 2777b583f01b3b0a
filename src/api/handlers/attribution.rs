//! Handler for referrer attribution.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::attribution::{AttributionQuery, AttributionResponse};
use crate::state::AppState;

/// Resolves which short link, if any, a referrer URL points at.
///
/// # Endpoint
///
/// `GET /api/attribution?url=https://go.example.com/my-url`
///
/// Always 200. Referrers that are not `https` links on the canonical host
/// yield `{"short_url": null}`.
pub async fn attribution_handler(
    State(state): State<AppState>,
    Query(query): Query<AttributionQuery>,
) -> Json<AttributionResponse> {
    Json(AttributionResponse {
        short_url: state.extractor.extract(&query.url),
    })
}
