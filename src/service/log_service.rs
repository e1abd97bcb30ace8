//! Log service: direct ingestion and filtered listing.

use std::sync::Arc;

use crate::domain::{LogEntry, LogFilter, LogPage, NewLog, Page};
use crate::error::ForgeError;
use crate::persistence::BotStore;

/// Orchestration layer for the log stream.
#[derive(Debug, Clone)]
pub struct LogService {
    store: Arc<dyn BotStore>,
    default_limit: u32,
    max_limit: u32,
}

impl LogService {
    /// Creates a new `LogService` with the given page-size bounds.
    #[must_use]
    pub fn new(store: Arc<dyn BotStore>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            store,
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Appends an entry for an existing bot.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::BotNotFound`] if the referenced bot does not
    /// exist.
    pub async fn create_log(&self, new: NewLog) -> Result<LogEntry, ForgeError> {
        let bot_id = new.bot_id;
        let entry = self
            .store
            .append_log(new)
            .await?
            .ok_or_else(|| ForgeError::BotNotFound(bot_id.to_string()))?;
        tracing::debug!(%bot_id, log_id = entry.id, level = %entry.level, "log ingested");
        Ok(entry)
    }

    /// Resolves caller-supplied pagination against the configured bounds.
    #[must_use]
    pub fn page(&self, limit: Option<u32>, offset: Option<u32>) -> Page {
        Page {
            limit: limit.unwrap_or(self.default_limit).clamp(1, self.max_limit),
            offset: offset.unwrap_or(0),
        }
    }

    /// Lists entries matching `filter`, newest first, with the unpaginated
    /// match count.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    pub async fn list_logs(&self, filter: LogFilter, page: Page) -> Result<LogPage, ForgeError> {
        self.store.list_logs(filter, page).await
    }
}
