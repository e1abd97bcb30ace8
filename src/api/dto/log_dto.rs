//! Log DTOs for ingestion and filtered listing.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::non_empty;
use crate::domain::{BotId, LogEntry, LogFilter, LogLevel, LogWithBot, NewLog};
use crate::error::ForgeError;

/// Request body for `POST /api/logs`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    /// Referenced bot (required).
    #[serde(default)]
    pub bot_id: Option<String>,
    /// `info` (default), `warn`, or `error`.
    #[serde(default)]
    pub level: Option<String>,
    /// Message text (required, non-empty).
    #[serde(default)]
    pub message: Option<String>,
    /// Optional JSON metadata; stored serialized.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

impl CreateLogRequest {
    /// Validates required fields and resolves the level.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidRequest`] if `botId` or `message` is
    /// missing or the level is unknown, and [`ForgeError::BotNotFound`] if
    /// `botId` cannot name any bot.
    pub fn into_new_log(self) -> Result<NewLog, ForgeError> {
        let (Some(raw_bot_id), Some(message)) = (non_empty(self.bot_id), non_empty(self.message))
        else {
            return Err(ForgeError::InvalidRequest(
                "botId and message are required".to_string(),
            ));
        };
        let bot_id = raw_bot_id
            .parse::<BotId>()
            .map_err(|_| ForgeError::BotNotFound(raw_bot_id.clone()))?;
        let level = match non_empty(self.level) {
            Some(raw) => raw.parse::<LogLevel>().map_err(ForgeError::InvalidRequest)?,
            None => LogLevel::Info,
        };
        let metadata = self
            .metadata
            .filter(|m| !m.is_null())
            .map(|m| m.to_string());
        Ok(NewLog {
            bot_id,
            level,
            message,
            metadata,
        })
    }
}

/// Query parameters for `GET /api/logs`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct LogListQuery {
    /// Only entries for this bot.
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Only entries at this level.
    #[serde(default)]
    pub level: Option<String>,
    /// Page size (default 100).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Entries skipped (default 0).
    #[serde(default)]
    pub offset: Option<u32>,
}

impl LogListQuery {
    /// Builds the equality filter. Empty values are ignored; returns `None`
    /// when a value can never match (unknown level, malformed bot id).
    #[must_use]
    pub fn filter(&self) -> Option<LogFilter> {
        let bot_id = match non_empty(self.bot_id.clone()) {
            Some(raw) => Some(raw.parse::<BotId>().ok()?),
            None => None,
        };
        let level = match non_empty(self.level.clone()) {
            Some(raw) => Some(raw.parse::<LogLevel>().ok()?),
            None => None,
        };
        Some(LogFilter { bot_id, level })
    }
}

/// Bot name embedded in log list items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BotNameDto {
    /// Display name of the bot.
    pub name: String,
}

/// A log entry in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogListItem {
    /// Log fields.
    #[serde(flatten)]
    pub entry: LogEntry,
    /// Referenced bot.
    pub bot: BotNameDto,
}

impl From<LogWithBot> for LogListItem {
    fn from(value: LogWithBot) -> Self {
        Self {
            entry: value.entry,
            bot: BotNameDto {
                name: value.bot_name,
            },
        }
    }
}

/// Response body for `GET /api/logs`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogListResponse {
    /// One page of entries, newest first.
    pub logs: Vec<LogListItem>,
    /// Number of entries matching the filters, ignoring pagination.
    pub total: u64,
}
