//! API route configuration.

use crate::api::handlers::{attribution_handler, record_click_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `GET  /stats/{short_url}` - Aggregate statistics for a link
/// - `POST /clicks`            - Record a click
/// - `GET  /attribution`       - Extract a short link from a referrer URL
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/{short_url}", get(stats_handler))
        .route("/clicks", post(record_click_handler))
        .route("/attribution", get(attribution_handler))
}
