//! Bot handlers: list, create, get, update, delete, and control.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BotDetailQuery, BotDetailResponse, BotListItem, BotListQuery, ControlRequest,
    CreateBotRequest, SuccessResponse, UpdateBotRequest,
};
use crate::app_state::AppState;
use crate::domain::{Bot, BotId, BotOrder, ControlAction};
use crate::error::{ErrorResponse, ForgeError};

/// Resolves a path segment to a [`BotId`]. Strings that cannot be an id
/// name no bot, so they are reported as not found.
fn parse_bot_id(raw: &str) -> Result<BotId, ForgeError> {
    raw.parse::<BotId>()
        .map_err(|_| ForgeError::BotNotFound(raw.to_string()))
}

/// `GET /bots`: List bots with log counts.
///
/// # Errors
///
/// Returns [`ForgeError`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/bots",
    tag = "Bots",
    summary = "List bots",
    description = "Returns every bot with its log count, newest-created first by default.",
    params(BotListQuery),
    responses(
        (status = 200, description = "Bot list", body = Vec<BotListItem>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_bots(
    State(state): State<AppState>,
    query: Result<Query<BotListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Query(query) = query?;
    let order = query.sort.map(BotOrder::from).unwrap_or_default();
    let bots = state.bot_service.list_bots(order, query.limit).await?;
    let items: Vec<BotListItem> = bots.into_iter().map(BotListItem::from).collect();
    Ok(Json(items))
}

/// `POST /bots`: Create a bot.
///
/// # Errors
///
/// Returns [`ForgeError::InvalidRequest`] if `name` or `type` is missing.
#[utoipa::path(
    post,
    path = "/api/bots",
    tag = "Bots",
    summary = "Create a bot",
    description = "Creates a bot in `stopped` state and records a creation log entry.",
    request_body = CreateBotRequest,
    responses(
        (status = 201, description = "Bot created", body = Bot),
        (status = 400, description = "Missing name or type", body = ErrorResponse),
    )
)]
pub async fn create_bot(
    State(state): State<AppState>,
    body: Result<Json<CreateBotRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Json(req) = body?;
    let new = req.into_new_bot()?;
    let bot = state.bot_service.create_bot(new).await?;
    Ok((StatusCode::CREATED, Json(bot)))
}

/// `GET /bots/{id}`: Get one bot with its recent logs.
///
/// # Errors
///
/// Returns [`ForgeError::BotNotFound`] if the bot does not exist.
#[utoipa::path(
    get,
    path = "/api/bots/{id}",
    tag = "Bots",
    summary = "Get bot details",
    description = "Returns a bot with up to 50 of its newest log entries.",
    params(
        ("id" = uuid::Uuid, Path, description = "Bot UUID"),
        BotDetailQuery,
    ),
    responses(
        (status = 200, description = "Bot details", body = BotDetailResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
    )
)]
pub async fn get_bot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<BotDetailQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Query(query) = query?;
    let id = parse_bot_id(&id)?;
    let include_logs = query.include_logs.unwrap_or(true);
    let (bot, logs) = state.bot_service.get_bot_with_logs(id, include_logs).await?;
    Ok(Json(BotDetailResponse { bot, logs }))
}

/// `PATCH /bots/{id}`: Partially update a bot.
///
/// # Errors
///
/// Returns [`ForgeError::BotNotFound`] if the bot does not exist, or
/// [`ForgeError::InvalidRequest`] for empty names/types or a status rejected
/// by strict mode.
#[utoipa::path(
    patch,
    path = "/api/bots/{id}",
    tag = "Bots",
    summary = "Update a bot",
    description = "Updates any subset of name, description, type, status, and config. Setting `status` appends a status-change log entry.",
    params(
        ("id" = uuid::Uuid, Path, description = "Bot UUID"),
    ),
    request_body = UpdateBotRequest,
    responses(
        (status = 200, description = "Updated bot", body = Bot),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
    )
)]
pub async fn update_bot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateBotRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Json(req) = body?;
    let id = parse_bot_id(&id)?;
    let changes = req.into_changes()?;
    let bot = state.bot_service.update_bot(id, changes).await?;
    Ok(Json(bot))
}

/// `DELETE /bots/{id}`: Delete a bot and its logs.
///
/// # Errors
///
/// Returns [`ForgeError::BotNotFound`] if the bot does not exist.
#[utoipa::path(
    delete,
    path = "/api/bots/{id}",
    tag = "Bots",
    summary = "Delete a bot",
    description = "Removes a bot together with all of its log entries.",
    params(
        ("id" = uuid::Uuid, Path, description = "Bot UUID"),
    ),
    responses(
        (status = 200, description = "Bot deleted", body = SuccessResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
    )
)]
pub async fn delete_bot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ForgeError> {
    let id = parse_bot_id(&id)?;
    state.bot_service.delete_bot(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `POST /bots/{id}/control`: Start, stop, or restart a bot.
///
/// # Errors
///
/// Returns [`ForgeError::InvalidAction`] for unknown actions and
/// [`ForgeError::BotNotFound`] if the bot does not exist.
#[utoipa::path(
    post,
    path = "/api/bots/{id}/control",
    tag = "Bots",
    summary = "Control a bot",
    description = "Maps start/stop/restart to a status and appends the matching log entry in one unit of work.",
    params(
        ("id" = uuid::Uuid, Path, description = "Bot UUID"),
    ),
    request_body = ControlRequest,
    responses(
        (status = 200, description = "Updated bot", body = Bot),
        (status = 400, description = "Invalid action", body = ErrorResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
    )
)]
pub async fn control_bot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ControlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ForgeError> {
    let Json(req) = body?;
    // An unknown action is a 400 even when the id names no bot.
    let action = req
        .action
        .unwrap_or_default()
        .parse::<ControlAction>()
        .map_err(ForgeError::InvalidAction)?;
    let id = parse_bot_id(&id)?;
    let bot = state.bot_service.control(id, action).await?;
    Ok(Json(bot))
}

/// Bot management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bots", get(list_bots).post(create_bot))
        .route(
            "/bots/{id}",
            get(get_bot).patch(update_bot).delete(delete_bot),
        )
        .route("/bots/{id}/control", post(control_bot))
}
