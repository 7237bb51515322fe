// Public API routes and DTOs

pub mod budget;
pub mod common;

pub use common::{ApiError, ErrorResponse, MessageResponse};
