//! Data Transfer Objects for REST request/response serialization.

pub mod probe_dto;
pub mod settings_dto;

pub use probe_dto::*;
pub use settings_dto::*;
