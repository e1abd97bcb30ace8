//! Bot service: CRUD orchestration and the lifecycle controller.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use crate::domain::{
    AuditEntry, Bot, BotChanges, BotId, BotOrder, BotStats, BotStatus, BotWithLogCount,
    ControlAction, LogEntry, LogFilter, NewBot, Page,
};
use crate::error::ForgeError;
use crate::persistence::BotStore;

/// Maximum number of log entries embedded in a bot detail.
pub const RECENT_LOG_LIMIT: u32 = 50;

/// Orchestration layer for bot operations.
///
/// Every status change goes through exactly one [`BotStore::update_bot`]
/// call carrying its audit entry, so the status write and the log line
/// commit together.
#[derive(Debug, Clone)]
pub struct BotService {
    store: Arc<dyn BotStore>,
    strict_status: bool,
    /// `None` when the configured hours do not fit a `TimeDelta`.
    recent_window: Option<TimeDelta>,
}

impl BotService {
    /// Creates a new `BotService`.
    ///
    /// With `strict_status`, partial updates may only write `stopped`,
    /// `running`, or `error`. `recent_window_hours` sizes the dashboard's
    /// recent-log counter.
    #[must_use]
    pub fn new(store: Arc<dyn BotStore>, strict_status: bool, recent_window_hours: i64) -> Self {
        Self {
            store,
            strict_status,
            recent_window: TimeDelta::try_hours(recent_window_hours),
        }
    }

    /// Creates a bot in `stopped` state together with its creation log.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    pub async fn create_bot(&self, new: NewBot) -> Result<Bot, ForgeError> {
        let audit = AuditEntry::bot_created(&new.name);
        let bot = self.store.create_bot(new, audit).await?;
        tracing::info!(bot_id = %bot.id, name = %bot.name, bot_type = %bot.bot_type, "bot created");
        Ok(bot)
    }

    /// Fetches one bot.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::BotNotFound`] if the bot does not exist.
    pub async fn get_bot(&self, id: BotId) -> Result<Bot, ForgeError> {
        self.store
            .get_bot(id)
            .await?
            .ok_or_else(|| ForgeError::BotNotFound(id.to_string()))
    }

    /// Fetches one bot and, if `include_logs`, its newest
    /// [`RECENT_LOG_LIMIT`] log entries.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::BotNotFound`] if the bot does not exist.
    pub async fn get_bot_with_logs(
        &self,
        id: BotId,
        include_logs: bool,
    ) -> Result<(Bot, Option<Vec<LogEntry>>), ForgeError> {
        let bot = self.get_bot(id).await?;
        if !include_logs {
            return Ok((bot, None));
        }
        let filter = LogFilter {
            bot_id: Some(id),
            level: None,
        };
        let page = Page {
            limit: RECENT_LOG_LIMIT,
            offset: 0,
        };
        let logs = self
            .store
            .list_logs(filter, page)
            .await?
            .logs
            .into_iter()
            .map(|l| l.entry)
            .collect();
        Ok((bot, Some(logs)))
    }

    /// Lists bots with log counts.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    pub async fn list_bots(
        &self,
        order: BotOrder,
        limit: Option<u32>,
    ) -> Result<Vec<BotWithLogCount>, ForgeError> {
        self.store.list_bots(order, limit).await
    }

    /// Applies a partial update. A present `status` appends a
    /// `Bot status changed to "<status>"` entry in the same unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::InvalidRequest`] for a status rejected by
    /// strict mode, or [`ForgeError::BotNotFound`] if the bot does not exist.
    pub async fn update_bot(&self, id: BotId, changes: BotChanges) -> Result<Bot, ForgeError> {
        if self.strict_status
            && let Some(status) = &changes.status
        {
            status
                .parse::<BotStatus>()
                .map_err(ForgeError::InvalidRequest)?;
        }

        let audit = changes.status.as_deref().map(AuditEntry::status_changed);
        let status_changed = audit.is_some();
        let bot = self
            .store
            .update_bot(id, changes, audit)
            .await?
            .ok_or_else(|| ForgeError::BotNotFound(id.to_string()))?;

        if status_changed {
            tracing::info!(bot_id = %id, status = %bot.status, "bot status updated");
        } else {
            tracing::debug!(bot_id = %id, "bot updated");
        }
        Ok(bot)
    }

    /// Deletes a bot and its log entries.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::BotNotFound`] if the bot does not exist.
    pub async fn delete_bot(&self, id: BotId) -> Result<(), ForgeError> {
        if !self.store.delete_bot(id).await? {
            return Err(ForgeError::BotNotFound(id.to_string()));
        }
        tracing::info!(bot_id = %id, "bot deleted");
        Ok(())
    }

    /// Applies a lifecycle action: writes the mapped status and appends the
    /// mapped `info` entry as one unit, returning the updated bot.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::BotNotFound`] if the bot does not exist; nothing
    /// is written in that case.
    pub async fn control(&self, id: BotId, action: ControlAction) -> Result<Bot, ForgeError> {
        let transition = action.transition();

        let bot = self
            .store
            .update_bot(
                id,
                BotChanges::status(transition.status),
                Some(transition.audit),
            )
            .await?
            .ok_or_else(|| ForgeError::BotNotFound(id.to_string()))?;

        tracing::info!(bot_id = %id, %action, status = %bot.status, "bot control applied");
        Ok(bot)
    }

    /// Dashboard counters over the configured recent window.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Internal`] if the window reaches past the
    /// representable time range, or [`ForgeError::Persistence`] on storage
    /// failure.
    pub async fn stats(&self) -> Result<BotStats, ForgeError> {
        let since = self
            .recent_window
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| ForgeError::Internal("recent-log window out of range".to_string()))?;
        self.store.stats(since).await
    }
}
