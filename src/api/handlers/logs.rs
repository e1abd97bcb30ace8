//! Log handlers: filtered listing and direct ingestion.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateLogRequest, LogListItem, LogListQuery, LogListResponse};
use crate::app_state::AppState;
use crate::domain::{LogEntry, LogPage};
use crate::error::{ErrorResponse, ForgeError};

/// `GET /logs`: List log entries, newest first.
///
/// # Errors
///
/// Returns [`ForgeError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    summary = "List logs",
    description = "Returns a page of log entries filtered by bot and/or level, newest first, plus the total match count.",
    params(LogListQuery),
    responses(
        (status = 200, description = "Log page", body = LogListResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<LogListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Query(query) = query?;
    let page = state.log_service.page(query.limit, query.offset);
    let result = match query.filter() {
        Some(filter) => state.log_service.list_logs(filter, page).await?,
        None => LogPage::default(),
    };
    Ok(Json(LogListResponse {
        logs: result.logs.into_iter().map(LogListItem::from).collect(),
        total: result.total,
    }))
}

/// `POST /logs`: Ingest a log entry.
///
/// # Errors
///
/// Returns [`ForgeError::InvalidRequest`] if `botId` or `message` is missing
/// and [`ForgeError::BotNotFound`] if the bot does not exist.
#[utoipa::path(
    post,
    path = "/api/logs",
    tag = "Logs",
    summary = "Create a log entry",
    description = "Appends an entry to a bot's log stream. Level defaults to `info`.",
    request_body = CreateLogRequest,
    responses(
        (status = 201, description = "Entry created", body = LogEntry),
        (status = 400, description = "Missing botId or message", body = ErrorResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
    )
)]
pub async fn create_log(
    State(state): State<AppState>,
    body: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Json(req) = body?;
    let new = req.into_new_log()?;
    let entry = state.log_service.create_log(new).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Log stream routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs).post(create_log))
}
