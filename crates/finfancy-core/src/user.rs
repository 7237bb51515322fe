// User domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Budget limit assigned at registration
pub const DEFAULT_BUDGET_LIMIT: i32 = 3000;

/// A registered user.
///
/// `email` is always stored normalized (trimmed, lowercased); it is the
/// case-insensitive uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-encoded digest, never the plaintext
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub budget_limit: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new user with a time-ordered id and the default budget limit
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            budget_limit: DEFAULT_BUDGET_LIMIT,
            created_at: Utc::now(),
        }
    }
}
