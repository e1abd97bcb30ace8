//! Persistence layer: the [`BotStore`] interface and its backends.
//!
//! Every write that must be observed together (a status change and its log
//! line, a new bot and its creation log) is a single trait call, so each
//! backend can commit it as one unit of work:
//!
//! - [`PostgresStore`] runs it inside one transaction (READ COMMITTED).
//! - [`MemoryStore`] runs it inside one write-lock critical section.
//!
//! Concurrent writers to the same bot are last-write-wins.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AuditEntry, Bot, BotChanges, BotId, BotOrder, BotStats, BotWithLogCount, LogEntry, LogFilter,
    LogPage, NewBot, NewLog, Page,
};
use crate::error::ForgeError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Storage contract for bots and their log entries.
#[async_trait]
pub trait BotStore: Send + Sync + fmt::Debug {
    /// Inserts a bot and its creation log entry as one unit.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn create_bot(&self, new: NewBot, audit: AuditEntry) -> Result<Bot, ForgeError>;

    /// Fetches a bot by id.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn get_bot(&self, id: BotId) -> Result<Option<Bot>, ForgeError>;

    /// Lists bots with their log counts in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn list_bots(
        &self,
        order: BotOrder,
        limit: Option<u32>,
    ) -> Result<Vec<BotWithLogCount>, ForgeError>;

    /// Applies `changes` and, if given, appends `audit` as one unit.
    ///
    /// Returns `None` (and writes nothing) when the bot does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn update_bot(
        &self,
        id: BotId,
        changes: BotChanges,
        audit: Option<AuditEntry>,
    ) -> Result<Option<Bot>, ForgeError>;

    /// Deletes a bot and its log entries. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn delete_bot(&self, id: BotId) -> Result<bool, ForgeError>;

    /// Appends a log entry. Returns `None` when the referenced bot does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn append_log(&self, new: NewLog) -> Result<Option<LogEntry>, ForgeError>;

    /// Returns one page of matching entries, newest first, with the total
    /// match count.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn list_logs(&self, filter: LogFilter, page: Page) -> Result<LogPage, ForgeError>;

    /// Computes dashboard counters; `recent_since` bounds the recent-log count.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] on storage failure.
    async fn stats(&self, recent_since: DateTime<Utc>) -> Result<BotStats, ForgeError>;
}
