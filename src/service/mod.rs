//! Service layer: business logic orchestration.
//!
//! [`BotService`] owns the bot lifecycle (creation, partial updates,
//! control actions) and [`LogService`] the log stream. Both delegate
//! storage to a shared [`crate::persistence::BotStore`].

pub mod bot_service;
pub mod log_service;

pub use bot_service::BotService;
pub use log_service::LogService;
