// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - DbUserStore: implements UserStore for user persistence
// - DbSessionStore: implements SessionStore for login sessions

pub mod models;
pub mod repositories;
pub mod session_store;
pub mod user_store;

pub use models::*;
pub use repositories::Database;
pub use session_store::{create_db_session_store, DbSessionStore};
pub use user_store::{create_db_user_store, DbUserStore};
