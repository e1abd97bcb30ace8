//! REST endpoint handlers organized by resource.

pub mod bots;
pub mod logs;
pub mod stats;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(bots::routes())
        .merge(logs::routes())
        .merge(stats::routes())
}
