//! # moltforge-api
//!
//! REST API for tracking bot records and their audit log stream.
//!
//! Bots carry a status (`stopped`, `running`, `error`) that changes through
//! lifecycle control actions or partial updates. Every status change is
//! paired with a log entry and both are committed as one unit of work. No
//! process is actually run: control only mutates records.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BotService / LogService (service/)
//!     ├── ControlAction mapping (domain/)
//!     │
//!     └── BotStore (persistence/)
//!           ├── PostgreSQL (sqlx)
//!           └── In-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
