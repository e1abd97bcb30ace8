//! PostgreSQL implementation of the persistence layer.
//!
//! Schema lives in `migrations/`. Paired writes run inside one transaction
//! at the server's default READ COMMITTED isolation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::BotStore;
use crate::config::ServiceConfig;
use crate::domain::{
    AuditEntry, Bot, BotChanges, BotId, BotOrder, BotStats, BotStatus, BotWithLogCount, LogEntry,
    LogFilter, LogLevel, LogPage, LogWithBot, NewBot, NewLog, Page,
};
use crate::error::ForgeError;

const BOT_COLUMNS: &str =
    "id, name, description, bot_type, status, config, created_at, updated_at";

type BotRow = (
    Uuid,
    String,
    Option<String>,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

type BotCountRow = (
    Uuid,
    String,
    Option<String>,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    i64,
);

type LogRow = (i64, Uuid, String, String, Option<String>, DateTime<Utc>);

type LogBotRow = (
    i64,
    Uuid,
    String,
    String,
    Option<String>,
    DateTime<Utc>,
    String,
);

fn bot_from_row(
    (id, name, description, bot_type, status, config, created_at, updated_at): BotRow,
) -> Bot {
    Bot {
        id: BotId::from_uuid(id),
        name,
        description,
        bot_type,
        status,
        config,
        created_at,
        updated_at,
    }
}

fn log_from_row(
    (id, bot_id, level, message, metadata, timestamp): LogRow,
) -> Result<LogEntry, ForgeError> {
    let level = level
        .parse::<LogLevel>()
        .map_err(|e| ForgeError::Persistence(format!("log {id}: {e}")))?;
    Ok(LogEntry {
        id,
        bot_id: BotId::from_uuid(bot_id),
        level,
        message,
        metadata,
        timestamp,
    })
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] if the database is unreachable.
    pub async fn connect(config: &ServiceConfig) -> Result<Self, ForgeError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies pending migrations from `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ForgeError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ForgeError::Persistence(e.to_string()))?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    async fn insert_log_tx(
        tx: &mut Transaction<'_, Postgres>,
        bot_id: BotId,
        audit: AuditEntry,
        metadata: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<LogEntry, ForgeError> {
        let row = sqlx::query_as::<_, LogRow>(
            "INSERT INTO logs (bot_id, level, message, metadata, logged_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, bot_id, level, message, metadata, logged_at",
        )
        .bind(bot_id.as_uuid())
        .bind(audit.level.as_str())
        .bind(audit.message)
        .bind(metadata)
        .bind(at)
        .fetch_one(&mut **tx)
        .await?;
        log_from_row(row)
    }
}

#[async_trait]
impl BotStore for PostgresStore {
    async fn create_bot(&self, new: NewBot, audit: AuditEntry) -> Result<Bot, ForgeError> {
        let now = Utc::now();
        let bot = Bot::from_new(new, now);

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO bots (id, name, description, bot_type, status, config, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(bot.id.as_uuid())
        .bind(&bot.name)
        .bind(&bot.description)
        .bind(&bot.bot_type)
        .bind(&bot.status)
        .bind(&bot.config)
        .bind(bot.created_at)
        .bind(bot.updated_at)
        .execute(&mut *tx)
        .await?;
        Self::insert_log_tx(&mut tx, bot.id, audit, None, now).await?;
        tx.commit().await?;

        Ok(bot)
    }

    async fn get_bot(&self, id: BotId) -> Result<Option<Bot>, ForgeError> {
        let row = sqlx::query_as::<_, BotRow>(&format!(
            "SELECT {BOT_COLUMNS} FROM bots WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(bot_from_row))
    }

    async fn list_bots(
        &self,
        order: BotOrder,
        limit: Option<u32>,
    ) -> Result<Vec<BotWithLogCount>, ForgeError> {
        let order_by = match order {
            BotOrder::CreatedDesc => "b.created_at DESC, b.id",
            BotOrder::UpdatedDesc => "b.updated_at DESC, b.id",
        };
        let rows = sqlx::query_as::<_, BotCountRow>(&format!(
            "SELECT b.id, b.name, b.description, b.bot_type, b.status, b.config, \
                    b.created_at, b.updated_at, \
                    (SELECT COUNT(*) FROM logs l WHERE l.bot_id = b.id) AS log_count \
             FROM bots b ORDER BY {order_by} LIMIT $1"
        ))
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, name, description, bot_type, status, config, created_at, updated_at, count)| {
                    BotWithLogCount {
                        bot: bot_from_row((
                            id,
                            name,
                            description,
                            bot_type,
                            status,
                            config,
                            created_at,
                            updated_at,
                        )),
                        log_count: non_negative(count),
                    }
                },
            )
            .collect())
    }

    async fn update_bot(
        &self,
        id: BotId,
        changes: BotChanges,
        audit: Option<AuditEntry>,
    ) -> Result<Option<Bot>, ForgeError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, BotRow>(&format!(
            "UPDATE bots SET \
                name = COALESCE($2, name), \
                description = CASE WHEN $3 THEN $4 ELSE description END, \
                bot_type = COALESCE($5, bot_type), \
                status = COALESCE($6, status), \
                config = COALESCE($7, config), \
                updated_at = $8 \
             WHERE id = $1 RETURNING {BOT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(changes.name)
        .bind(changes.description.is_some())
        .bind(changes.description.flatten())
        .bind(changes.bot_type)
        .bind(changes.status)
        .bind(changes.config)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(audit) = audit {
            Self::insert_log_tx(&mut tx, id, audit, None, now).await?;
        }
        tx.commit().await?;

        Ok(Some(bot_from_row(row)))
    }

    async fn delete_bot(&self, id: BotId) -> Result<bool, ForgeError> {
        // logs.bot_id is ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM bots WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_log(&self, new: NewLog) -> Result<Option<LogEntry>, ForgeError> {
        let mut tx = self.pool.begin().await?;

        // Row lock keeps a concurrent delete from orphaning the entry.
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM bots WHERE id = $1 FOR SHARE")
            .bind(new.bot_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            tx.rollback().await?;
            return Ok(None);
        }

        let audit = AuditEntry {
            level: new.level,
            message: new.message,
        };
        let entry = Self::insert_log_tx(&mut tx, new.bot_id, audit, new.metadata, Utc::now()).await?;
        tx.commit().await?;
        Ok(Some(entry))
    }

    async fn list_logs(&self, filter: LogFilter, page: Page) -> Result<LogPage, ForgeError> {
        let bot_id = filter.bot_id.map(Uuid::from);
        let level = filter.level.map(LogLevel::as_str);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM logs \
             WHERE ($1::uuid IS NULL OR bot_id = $1) AND ($2::text IS NULL OR level = $2)",
        )
        .bind(bot_id)
        .bind(level)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, LogBotRow>(
            "SELECT l.id, l.bot_id, l.level, l.message, l.metadata, l.logged_at, b.name \
             FROM logs l JOIN bots b ON b.id = l.bot_id \
             WHERE ($1::uuid IS NULL OR l.bot_id = $1) AND ($2::text IS NULL OR l.level = $2) \
             ORDER BY l.logged_at DESC, l.id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(bot_id)
        .bind(level)
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        let logs = rows
            .into_iter()
            .map(|(id, bot_id, level, message, metadata, timestamp, bot_name)| {
                log_from_row((id, bot_id, level, message, metadata, timestamp))
                    .map(|entry| LogWithBot { entry, bot_name })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LogPage {
            logs,
            total: non_negative(total),
        })
    }

    async fn stats(&self, recent_since: DateTime<Utc>) -> Result<BotStats, ForgeError> {
        let (total, running, errored) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE status = $1), \
                    COUNT(*) FILTER (WHERE status = $2) \
             FROM bots",
        )
        .bind(BotStatus::Running.as_str())
        .bind(BotStatus::Error.as_str())
        .fetch_one(&self.pool)
        .await?;

        let recent = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM logs WHERE logged_at >= $1")
            .bind(recent_since)
            .fetch_one(&self.pool)
            .await?;

        Ok(BotStats {
            total_bots: non_negative(total),
            running_bots: non_negative(running),
            error_bots: non_negative(errored),
            recent_logs: non_negative(recent),
        })
    }
}
