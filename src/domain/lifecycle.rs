//! Lifecycle control actions and their status/log mapping.
//!
//! | action    | status    | log message       |
//! |-----------|-----------|-------------------|
//! | `start`   | `running` | `Bot started`     |
//! | `stop`    | `stopped` | `Bot stopped`     |
//! | `restart` | `running` | `Bot restarted`   |
//!
//! There is no transition guard: any action is valid from any status.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use utoipa::ToSchema;

use super::BotStatus;
use super::log_entry::AuditEntry;

/// A coarse-grained control intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    /// Mark the bot running.
    Start,
    /// Mark the bot stopped.
    Stop,
    /// Mark the bot running again.
    Restart,
}

/// Outcome of mapping an action: the status to write and the entry to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Status written to the bot.
    pub status: BotStatus,
    /// Entry appended in the same unit of work.
    pub audit: AuditEntry,
}

impl ControlAction {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Status produced by this action.
    #[must_use]
    pub const fn target_status(self) -> BotStatus {
        match self {
            Self::Start | Self::Restart => BotStatus::Running,
            Self::Stop => BotStatus::Stopped,
        }
    }

    /// Message logged for this action.
    #[must_use]
    pub const fn log_message(self) -> &'static str {
        match self {
            Self::Start => "Bot started",
            Self::Stop => "Bot stopped",
            Self::Restart => "Bot restarted",
        }
    }

    /// Full mapping for this action.
    #[must_use]
    pub fn transition(self) -> Transition {
        Transition {
            status: self.target_status(),
            audit: AuditEntry::info(self.log_message()),
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            other => Err(other.to_string()),
        }
    }
}
