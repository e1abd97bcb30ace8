//! Immutable audit log entries attached to bots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::BotId;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational; the default.
    #[default]
    Info,
    /// Something worth a look.
    Warn,
    /// A failure.
    Error,
}

impl LogLevel {
    /// Returns the wire/storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown log level \"{other}\"; expected info, warn, or error"
            )),
        }
    }
}

/// A persisted log entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Monotonic row id; breaks timestamp ties.
    pub id: i64,
    /// Bot the entry belongs to.
    #[schema(value_type = uuid::Uuid)]
    pub bot_id: BotId,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message, never empty.
    pub message: String,
    /// Optional JSON metadata serialized as text.
    pub metadata: Option<String>,
    /// Creation time; the ordering key.
    pub timestamp: DateTime<Utc>,
}

/// Level and message of an entry written alongside another mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Severity.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
}

impl AuditEntry {
    /// An `info` entry with the given message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    /// The entry recorded when a bot is created.
    #[must_use]
    pub fn bot_created(name: &str) -> Self {
        Self::info(format!("Bot \"{name}\" created successfully"))
    }

    /// The entry recorded when a partial update sets `status`.
    ///
    /// `error` statuses are logged at `error` level, everything else at
    /// `info`.
    #[must_use]
    pub fn status_changed(status: &str) -> Self {
        let level = if status == "error" {
            LogLevel::Error
        } else {
            LogLevel::Info
        };
        Self {
            level,
            message: format!("Bot status changed to \"{status}\""),
        }
    }
}

/// Validated input for direct log ingestion.
#[derive(Debug, Clone)]
pub struct NewLog {
    /// Bot the entry belongs to.
    pub bot_id: BotId,
    /// Severity.
    pub level: LogLevel,
    /// Non-empty message.
    pub message: String,
    /// Serialized JSON metadata.
    pub metadata: Option<String>,
}

/// Equality filters for log listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Restrict to one bot.
    pub bot_id: Option<BotId>,
    /// Restrict to one level.
    pub level: Option<LogLevel>,
}

impl LogFilter {
    /// Returns `true` if `entry` passes every set filter.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.bot_id.is_none_or(|id| entry.bot_id == id)
            && self.level.is_none_or(|level| entry.level == level)
    }
}

/// Offset pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of entries returned.
    pub limit: u32,
    /// Number of matching entries skipped.
    pub offset: u32,
}

/// A log entry joined with its bot's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWithBot {
    /// The entry.
    pub entry: LogEntry,
    /// Name of the referenced bot.
    pub bot_name: String,
}

/// One page of log entries plus the unpaginated match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPage {
    /// Entries on this page, newest first.
    pub logs: Vec<LogWithBot>,
    /// Number of entries matching the filter.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_changed_picks_level_from_status() {
        let err = AuditEntry::status_changed("error");
        assert_eq!(err.level, LogLevel::Error);
        assert_eq!(err.message, "Bot status changed to \"error\"");

        let running = AuditEntry::status_changed("running");
        assert_eq!(running.level, LogLevel::Info);

        let odd = AuditEntry::status_changed("paused");
        assert_eq!(odd.level, LogLevel::Info);
        assert_eq!(odd.message, "Bot status changed to \"paused\"");
    }

    #[test]
    fn bot_created_quotes_the_name() {
        let entry = AuditEntry::bot_created("X");
        assert_eq!(entry.message, "Bot \"X\" created successfully");
        assert_eq!(entry.level, LogLevel::Info);
    }

    #[test]
    fn filter_requires_all_set_fields() {
        let bot = BotId::new();
        let entry = LogEntry {
            id: 1,
            bot_id: bot,
            level: LogLevel::Warn,
            message: "disk almost full".to_string(),
            metadata: None,
            timestamp: Utc::now(),
        };

        assert!(LogFilter::default().matches(&entry));
        assert!(
            LogFilter {
                bot_id: Some(bot),
                level: Some(LogLevel::Warn)
            }
            .matches(&entry)
        );
        assert!(
            !LogFilter {
                bot_id: Some(bot),
                level: Some(LogLevel::Error)
            }
            .matches(&entry)
        );
        assert!(
            !LogFilter {
                bot_id: Some(BotId::new()),
                level: None
            }
            .matches(&entry)
        );
    }

    #[test]
    fn level_round_trips_through_str() {
        for level in [LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            assert_eq!(level.as_str().parse::<LogLevel>(), Ok(level));
        }
        assert!("debug".parse::<LogLevel>().is_err());
    }
}
