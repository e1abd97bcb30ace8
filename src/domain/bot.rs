//! Bot records and their status vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::BotId;

/// Status values the service itself produces.
///
/// The stored `status` column is an open string (partial updates may write
/// anything unless strict mode is on), but every status written by the
/// lifecycle controller or at creation comes from this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    /// Initial status of every new bot.
    Stopped,
    /// Set by `start` and `restart`.
    Running,
    /// Only reachable through a partial update.
    Error,
}

impl BotStatus {
    /// Returns the wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(Self::Stopped),
            "running" => Ok(Self::Running),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown status \"{other}\"; expected stopped, running, or error"
            )),
        }
    }
}

/// A persisted bot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    /// Unique bot identifier (immutable after creation).
    #[schema(value_type = uuid::Uuid)]
    pub id: BotId,
    /// Display name, never empty.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Categorical tag such as `trading` or `chat`.
    #[serde(rename = "type")]
    pub bot_type: String,
    /// Current status string.
    pub status: String,
    /// JSON configuration serialized as text.
    pub config: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Bot {
    /// Builds a fresh `stopped` bot from validated input, stamped with `now`.
    #[must_use]
    pub fn from_new(new: NewBot, now: DateTime<Utc>) -> Self {
        Self {
            id: BotId::new(),
            name: new.name,
            description: new.description,
            bot_type: new.bot_type,
            status: BotStatus::Stopped.as_str().to_string(),
            config: new.config,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place and bumps `updated_at`.
    pub fn apply(&mut self, changes: &BotChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        if let Some(bot_type) = &changes.bot_type {
            self.bot_type.clone_from(bot_type);
        }
        if let Some(status) = &changes.status {
            self.status.clone_from(status);
        }
        if let Some(config) = &changes.config {
            self.config.clone_from(config);
        }
        self.updated_at = now;
    }
}

/// Validated input for bot creation.
#[derive(Debug, Clone)]
pub struct NewBot {
    /// Non-empty display name.
    pub name: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Non-empty type tag.
    pub bot_type: String,
    /// Serialized JSON configuration.
    pub config: String,
}

/// Field-level changes for a partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct BotChanges {
    /// New display name.
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    /// New type tag.
    pub bot_type: Option<String>,
    /// New status string.
    pub status: Option<String>,
    /// New serialized configuration.
    pub config: Option<String>,
}

impl BotChanges {
    /// Changes that only touch the status column.
    #[must_use]
    pub fn status(status: BotStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }
}

/// Ordering for bot listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BotOrder {
    /// Newest-created first.
    #[default]
    CreatedDesc,
    /// Most-recently-updated first.
    UpdatedDesc,
}

/// A bot together with the number of log entries referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotWithLogCount {
    /// The bot record.
    pub bot: Bot,
    /// Number of log entries for this bot.
    pub log_count: u64,
}

/// Aggregate counters for the dashboard overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BotStats {
    /// Number of bots.
    pub total_bots: u64,
    /// Bots whose status is `running`.
    pub running_bots: u64,
    /// Bots whose status is `error`.
    pub error_bots: u64,
    /// Log entries inside the recent window.
    pub recent_logs: u64,
}
