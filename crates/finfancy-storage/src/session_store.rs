// Database-backed SessionStore implementation
//
// Sessions are stored with naive TIMESTAMP columns. Every row is reinterpreted
// as UTC on the way out, so callers only ever compare DateTime<Utc> values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use finfancy_core::{traits::SessionStore, Session, StoreResult};
use tracing::{debug, instrument};

use crate::models::SessionRow;
use crate::repositories::Database;
use crate::user_store::map_sqlx_error;

// ============================================================================
// DbSessionStore - Persists login sessions in Postgres
// ============================================================================

/// Database-backed session store
#[derive(Clone)]
pub struct DbSessionStore {
    db: Database,
}

impl DbSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for DbSessionStore {
    #[instrument(skip_all, fields(user_id = %session.user_id))]
    async fn insert_session(&self, session: Session) -> StoreResult<()> {
        self.db
            .create_session(SessionRow::from(session))
            .await
            .map_err(map_sqlx_error)
    }

    #[instrument(skip_all)]
    async fn find_session_by_token(&self, token: &str) -> StoreResult<Option<Session>> {
        let row = self
            .db
            .get_session_by_token(token)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Session::from))
    }

    #[instrument(skip_all)]
    async fn delete_session_by_token(&self, token: &str) -> StoreResult<bool> {
        self.db
            .delete_session_by_token(token)
            .await
            .map_err(map_sqlx_error)
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let removed = self
            .db
            .delete_expired_sessions(now)
            .await
            .map_err(map_sqlx_error)?;
        debug!(removed, "Deleted expired sessions");
        Ok(removed)
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a database-backed session store
pub fn create_db_session_store(db: Database) -> DbSessionStore {
    DbSessionStore::new(db)
}
