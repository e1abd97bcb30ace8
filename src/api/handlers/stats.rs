//! Dashboard overview counters.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::BotStats;
use crate::error::{ErrorResponse, ForgeError};

/// `GET /stats`: Bot and log counters for the dashboard.
///
/// # Errors
///
/// Returns [`ForgeError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    summary = "Dashboard counters",
    description = "Total, running, and errored bot counts plus the number of log entries in the recent window (24h by default).",
    responses(
        (status = 200, description = "Counters", body = BotStats),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ForgeError> {
    Ok(Json(state.bot_service.stats().await?))
}

/// Stats routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}
