//! Bot DTOs for create, update, control, and list operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{double_option, non_empty};
use crate::domain::{Bot, BotChanges, BotOrder, BotWithLogCount, LogEntry, NewBot};
use crate::error::ForgeError;

/// Request body for `POST /api/bots`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBotRequest {
    /// Display name (required, non-empty).
    #[serde(default)]
    pub name: Option<String>,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Type tag such as `trading`, `chat`, `automation`, `custom` (required).
    #[serde(default, rename = "type")]
    pub bot_type: Option<String>,
    /// Arbitrary JSON configuration; stored serialized, `{}` when omitted.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub config: Option<serde_json::Value>,
}

impl CreateBotRequest {
    /// Validates required fields and serializes `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidRequest`] if `name` or `type` is missing
    /// or empty.
    pub fn into_new_bot(self) -> Result<NewBot, ForgeError> {
        let (Some(name), Some(bot_type)) = (non_empty(self.name), non_empty(self.bot_type)) else {
            return Err(ForgeError::InvalidRequest(
                "Name and type are required".to_string(),
            ));
        };
        let config = self
            .config
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()))
            .to_string();
        Ok(NewBot {
            name,
            description: self.description,
            bot_type,
            config,
        })
    }
}

/// Request body for `PATCH /api/bots/{id}`. Every field is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBotRequest {
    /// New display name (non-empty when present).
    #[serde(default)]
    pub name: Option<String>,
    /// New description; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    /// New type tag (non-empty when present).
    #[serde(default, rename = "type")]
    pub bot_type: Option<String>,
    /// New status; writing it appends a status-change log entry.
    #[serde(default)]
    pub status: Option<String>,
    /// New JSON configuration; `null` is stored as the JSON text `null`.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Object>, nullable)]
    pub config: Option<Option<serde_json::Value>>,
}

impl UpdateBotRequest {
    /// Converts into domain changes.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidRequest`] if `name` or `type` is present
    /// but empty.
    pub fn into_changes(self) -> Result<BotChanges, ForgeError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ForgeError::InvalidRequest("Name must not be empty".to_string()));
        }
        if self.bot_type.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ForgeError::InvalidRequest("Type must not be empty".to_string()));
        }
        Ok(BotChanges {
            name: self.name,
            description: self.description,
            bot_type: self.bot_type,
            status: self.status,
            config: self
                .config
                .map(|c| c.unwrap_or(serde_json::Value::Null).to_string()),
        })
    }
}

/// Request body for `POST /api/bots/{id}/control`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ControlRequest {
    /// One of `start`, `stop`, `restart`.
    #[serde(default)]
    pub action: Option<String>,
}

/// Sort key for bot listings.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BotSort {
    /// Newest-created first.
    #[default]
    Created,
    /// Most-recently-updated first.
    Updated,
}

impl From<BotSort> for BotOrder {
    fn from(sort: BotSort) -> Self {
        match sort {
            BotSort::Created => Self::CreatedDesc,
            BotSort::Updated => Self::UpdatedDesc,
        }
    }
}

/// Query parameters for `GET /api/bots`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BotListQuery {
    /// `created` (default) or `updated`.
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub sort: Option<BotSort>,
    /// Maximum number of bots returned.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Query parameters for `GET /api/bots/{id}`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct BotDetailQuery {
    /// Embed the 50 newest log entries (default `true`).
    #[serde(default)]
    pub include_logs: Option<bool>,
}

/// Log count wrapper serialized as `_count`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogCountDto {
    /// Number of log entries for the bot.
    pub logs: u64,
}

/// A bot in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BotListItem {
    /// Bot fields.
    #[serde(flatten)]
    pub bot: Bot,
    /// Related-row counts.
    #[serde(rename = "_count")]
    pub count: LogCountDto,
}

impl From<BotWithLogCount> for BotListItem {
    fn from(value: BotWithLogCount) -> Self {
        Self {
            bot: value.bot,
            count: LogCountDto {
                logs: value.log_count,
            },
        }
    }
}

/// Response body for `GET /api/bots/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BotDetailResponse {
    /// Bot fields.
    #[serde(flatten)]
    pub bot: Bot,
    /// Newest log entries first; omitted when `includeLogs=false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<LogEntry>>,
}
