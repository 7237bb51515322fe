// Store traits for pluggable backends
//
// These traits allow the authenticator to be used with different backends:
// - In-memory implementations for dev mode and testing
// - Database implementations for production
//
// Both stores must provide an atomic unique insert. Nothing else needs to be
// transactional: deletes are idempotent, so two requests racing to purge the
// same expired session is harmless.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::session::Session;
use crate::user::User;

// ============================================================================
// UserStore - For persisting user records
// ============================================================================

/// Trait for storing and retrieving users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `StoreError::DuplicateKey` if the email is taken.
    async fn insert_user(&self, user: User) -> StoreResult<()>;

    /// Find a user by (normalized) email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Find a user by id
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Set a user's budget limit. Returns false if the user does not exist.
    async fn update_budget_limit(&self, id: Uuid, value: i32) -> StoreResult<bool>;
}

// ============================================================================
// SessionStore - For persisting login sessions
// ============================================================================

/// Trait for storing and retrieving sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session. Fails with `StoreError::DuplicateKey` if the token exists.
    async fn insert_session(&self, session: Session) -> StoreResult<()>;

    /// Find a session by its token
    async fn find_session_by_token(&self, token: &str) -> StoreResult<Option<Session>>;

    /// Delete a session by its token. Returns whether a record was removed.
    async fn delete_session_by_token(&self, token: &str) -> StoreResult<bool>;

    /// Delete every session whose expiry is at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;
}
