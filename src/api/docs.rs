//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use super::dto::{
    BotDetailResponse, BotListItem, BotNameDto, BotSort, ControlRequest, CreateBotRequest,
    CreateLogRequest, LogCountDto, LogListItem, LogListResponse, SuccessResponse,
    UpdateBotRequest,
};
use super::handlers::{bots, logs, stats, system};
use crate::domain::{Bot, BotStats, BotStatus, ControlAction, LogEntry, LogLevel};
use crate::error::ErrorResponse;

/// OpenAPI 3 description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "moltforge-api",
        description = "Bot records, lifecycle control, and their audit log stream."
    ),
    paths(
        bots::list_bots,
        bots::create_bot,
        bots::get_bot,
        bots::update_bot,
        bots::delete_bot,
        bots::control_bot,
        logs::list_logs,
        logs::create_log,
        stats::get_stats,
        system::health_handler,
    ),
    components(schemas(
        Bot,
        BotStatus,
        BotStats,
        BotSort,
        BotListItem,
        BotDetailResponse,
        BotNameDto,
        LogCountDto,
        ControlAction,
        ControlRequest,
        CreateBotRequest,
        UpdateBotRequest,
        LogEntry,
        LogLevel,
        LogListItem,
        LogListResponse,
        CreateLogRequest,
        SuccessResponse,
        ErrorResponse,
        system::HealthResponse,
    )),
    tags(
        (name = "Bots", description = "Bot records and lifecycle control"),
        (name = "Logs", description = "Per-bot audit log stream"),
        (name = "Stats", description = "Dashboard counters"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
