//! Domain layer: bot and log records plus the lifecycle mapping.
//!
//! These types carry no I/O. Persistence lives in [`crate::persistence`]
//! and orchestration in [`crate::service`].

pub mod bot;
pub mod bot_id;
pub mod lifecycle;
pub mod log_entry;

pub use bot::{Bot, BotChanges, BotOrder, BotStats, BotStatus, BotWithLogCount, NewBot};
pub use bot_id::BotId;
pub use lifecycle::{ControlAction, Transition};
pub use log_entry::{AuditEntry, LogEntry, LogFilter, LogLevel, LogPage, LogWithBot, NewLog, Page};
