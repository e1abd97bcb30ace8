//! Data Transfer Objects for REST request/response serialization.
//!
//! Wire names are camelCase. `config` and `metadata` arrive as JSON and
//! leave as serialized text.

pub mod bot_dto;
pub mod common_dto;
pub mod log_dto;

pub use bot_dto::*;
pub use common_dto::*;
pub use log_dto::*;
