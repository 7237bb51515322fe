// In-memory implementations for dev mode and testing
//
// These implementations keep all data in memory, making them suitable for:
// - Running the API without a database
// - Unit tests
//
// Uniqueness checks and inserts happen under a single write guard, so they give
// the same atomic unique-insert guarantee as a database constraint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::session::Session;
use crate::traits::{SessionStore, UserStore};
use crate::user::User;

// ============================================================================
// InMemoryUserStore - Stores users in memory
// ============================================================================

/// In-memory user store
///
/// Users are keyed by id; email lookups scan the map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Remove a user (not part of the contract; used to simulate deleted accounts)
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey);
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_budget_limit(&self, id: Uuid, value: i32) -> StoreResult<bool> {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.budget_limit = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ============================================================================
// InMemorySessionStore - Stores sessions in memory
// ============================================================================

/// In-memory session store
///
/// Sessions are keyed by token.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (live or not yet purged)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Sessions belonging to a user
    pub async fn sessions_for_user(&self, user_id: Uuid) -> Vec<Session> {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert_session(&self, session: Session) -> StoreResult<()> {
        let mut sessions = self.sessions.write().await;
        let key = session.token.as_str().to_string();
        if sessions.contains_key(&key) {
            return Err(StoreError::DuplicateKey);
        }
        sessions.insert(key, session);
        Ok(())
    }

    async fn find_session_by_token(&self, token: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn delete_session_by_token(&self, token: &str) -> StoreResult<bool> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
