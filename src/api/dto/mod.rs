//! Data Transfer Objects for REST response serialization.
//!
//! Domain identifiers are flattened to plain strings and UUIDs so the
//! OpenAPI schema stays free of internal newtypes.

pub mod common_dto;
pub mod room_dto;

pub use common_dto::*;
pub use room_dto::*;
