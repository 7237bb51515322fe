// Database-backed UserStore implementation

use async_trait::async_trait;
use finfancy_core::{traits::UserStore, StoreError, StoreResult, User};
use tracing::{error, instrument};
use uuid::Uuid;

use crate::models::UserRow;
use crate::repositories::Database;

// ============================================================================
// DbUserStore - Persists users in Postgres
// ============================================================================

/// Database-backed user store
///
/// The unique index on `users.email` is the authoritative uniqueness gate;
/// violations surface as `StoreError::DuplicateKey`.
#[derive(Clone)]
pub struct DbUserStore {
    db: Database,
}

impl DbUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DbUserStore {
    #[instrument(skip_all, fields(user_id = %user.id))]
    async fn insert_user(&self, user: User) -> StoreResult<()> {
        self.db
            .create_user(UserRow::from(user))
            .await
            .map_err(map_sqlx_error)
    }

    #[instrument(skip_all)]
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = self
            .db
            .get_user_by_email(email)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = self.db.get_user(id).await.map_err(map_sqlx_error)?;
        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn update_budget_limit(&self, id: Uuid, value: i32) -> StoreResult<bool> {
        self.db
            .update_user_budget_limit(id, value)
            .await
            .map_err(map_sqlx_error)
    }
}

/// Map a sqlx error onto the store error contract
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let unique_violation = err
        .as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false);

    if unique_violation {
        StoreError::DuplicateKey
    } else {
        error!("Database error: {}", err);
        StoreError::Backend(err.into())
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Create a database-backed user store
pub fn create_db_user_store(db: Database) -> DbUserStore {
    DbUserStore::new(db)
}
