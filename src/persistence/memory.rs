//! In-process store for development and tests.
//!
//! Both tables live behind one [`tokio::sync::RwLock`], so every trait call
//! is a single critical section: readers never observe a status change
//! without its log entry. Nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::BotStore;
use crate::domain::{
    AuditEntry, Bot, BotChanges, BotId, BotOrder, BotStats, BotStatus, BotWithLogCount, LogEntry,
    LogFilter, LogPage, LogWithBot, NewBot, NewLog, Page,
};
use crate::error::ForgeError;

#[derive(Debug)]
struct StoredBot {
    bot: Bot,
    created_seq: u64,
    touched_seq: u64,
}

#[derive(Debug, Default)]
struct Tables {
    bots: HashMap<BotId, StoredBot>,
    /// Append-only, so insertion order is timestamp order.
    logs: Vec<LogEntry>,
    next_log_id: i64,
    seq: u64,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq = self.seq.saturating_add(1);
        self.seq
    }

    fn push_log(&mut self, bot_id: BotId, audit: AuditEntry, metadata: Option<String>) -> LogEntry {
        self.next_log_id = self.next_log_id.saturating_add(1);
        let entry = LogEntry {
            id: self.next_log_id,
            bot_id,
            level: audit.level,
            message: audit.message,
            metadata,
            timestamp: Utc::now(),
        };
        self.logs.push(entry.clone());
        entry
    }
}

/// `RwLock`-guarded in-memory implementation of [`BotStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BotStore for MemoryStore {
    async fn create_bot(&self, new: NewBot, audit: AuditEntry) -> Result<Bot, ForgeError> {
        let mut tables = self.tables.write().await;
        let bot = Bot::from_new(new, Utc::now());
        let seq = tables.next_seq();
        tables.bots.insert(
            bot.id,
            StoredBot {
                bot: bot.clone(),
                created_seq: seq,
                touched_seq: seq,
            },
        );
        tables.push_log(bot.id, audit, None);
        Ok(bot)
    }

    async fn get_bot(&self, id: BotId) -> Result<Option<Bot>, ForgeError> {
        let tables = self.tables.read().await;
        Ok(tables.bots.get(&id).map(|stored| stored.bot.clone()))
    }

    async fn list_bots(
        &self,
        order: BotOrder,
        limit: Option<u32>,
    ) -> Result<Vec<BotWithLogCount>, ForgeError> {
        let tables = self.tables.read().await;

        let mut counts: HashMap<BotId, u64> = HashMap::with_capacity(tables.bots.len());
        for entry in &tables.logs {
            *counts.entry(entry.bot_id).or_default() += 1;
        }

        let mut stored: Vec<&StoredBot> = tables.bots.values().collect();
        match order {
            BotOrder::CreatedDesc => stored.sort_by(|a, b| {
                (b.bot.created_at, b.created_seq).cmp(&(a.bot.created_at, a.created_seq))
            }),
            BotOrder::UpdatedDesc => stored.sort_by(|a, b| {
                (b.bot.updated_at, b.touched_seq).cmp(&(a.bot.updated_at, a.touched_seq))
            }),
        }

        let take = limit.map_or(usize::MAX, |l| l as usize);
        Ok(stored
            .into_iter()
            .take(take)
            .map(|s| BotWithLogCount {
                bot: s.bot.clone(),
                log_count: counts.get(&s.bot.id).copied().unwrap_or(0),
            })
            .collect())
    }

    async fn update_bot(
        &self,
        id: BotId,
        changes: BotChanges,
        audit: Option<AuditEntry>,
    ) -> Result<Option<Bot>, ForgeError> {
        let mut tables = self.tables.write().await;
        let seq = tables.next_seq();
        let Some(stored) = tables.bots.get_mut(&id) else {
            return Ok(None);
        };
        stored.bot.apply(&changes, Utc::now());
        stored.touched_seq = seq;
        let bot = stored.bot.clone();

        if let Some(audit) = audit {
            tables.push_log(id, audit, None);
        }
        Ok(Some(bot))
    }

    async fn delete_bot(&self, id: BotId) -> Result<bool, ForgeError> {
        let mut tables = self.tables.write().await;
        if tables.bots.remove(&id).is_none() {
            return Ok(false);
        }
        tables.logs.retain(|entry| entry.bot_id != id);
        Ok(true)
    }

    async fn append_log(&self, new: NewLog) -> Result<Option<LogEntry>, ForgeError> {
        let mut tables = self.tables.write().await;
        if !tables.bots.contains_key(&new.bot_id) {
            return Ok(None);
        }
        let audit = AuditEntry {
            level: new.level,
            message: new.message,
        };
        Ok(Some(tables.push_log(new.bot_id, audit, new.metadata)))
    }

    async fn list_logs(&self, filter: LogFilter, page: Page) -> Result<LogPage, ForgeError> {
        let tables = self.tables.read().await;

        let mut total: u64 = 0;
        let mut logs = Vec::new();
        for entry in tables.logs.iter().rev().filter(|e| filter.matches(e)) {
            let position = total;
            total += 1;
            if position < u64::from(page.offset)
                || logs.len() >= page.limit as usize
            {
                continue;
            }
            let bot_name = tables
                .bots
                .get(&entry.bot_id)
                .map(|s| s.bot.name.clone())
                .unwrap_or_default();
            logs.push(LogWithBot {
                entry: entry.clone(),
                bot_name,
            });
        }

        Ok(LogPage { logs, total })
    }

    async fn stats(&self, recent_since: DateTime<Utc>) -> Result<BotStats, ForgeError> {
        let tables = self.tables.read().await;
        let count_status = |status: BotStatus| {
            tables
                .bots
                .values()
                .filter(|s| s.bot.status == status.as_str())
                .count() as u64
        };
        Ok(BotStats {
            total_bots: tables.bots.len() as u64,
            running_bots: count_status(BotStatus::Running),
            error_bots: count_status(BotStatus::Error),
            recent_logs: tables
                .logs
                .iter()
                .filter(|e| e.timestamp >= recent_since)
                .count() as u64,
        })
    }
}
