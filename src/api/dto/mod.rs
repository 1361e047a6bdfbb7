//! Data Transfer Objects for REST request/response serialization.

pub mod chat_dto;
pub mod common_dto;
pub mod event_dto;
pub mod poll_dto;

pub use chat_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use poll_dto::*;
