//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::persistence::BotStore;
use crate::service::{BotService, LogService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Bot CRUD and lifecycle control.
    pub bot_service: Arc<BotService>,
    /// Log ingestion and listing.
    pub log_service: Arc<LogService>,
}

impl AppState {
    /// Wires both services over one store using the limits in `config`.
    #[must_use]
    pub fn new(store: Arc<dyn BotStore>, config: &ServiceConfig) -> Self {
        let bot_service = BotService::new(
            Arc::clone(&store),
            config.strict_status,
            config.stats_recent_window_hours,
        );
        let log_service = LogService::new(store, config.logs_default_limit, config.logs_max_limit);
        Self {
            bot_service: Arc::new(bot_service),
            log_service: Arc::new(log_service),
        }
    }
}
