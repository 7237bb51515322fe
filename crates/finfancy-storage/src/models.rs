// Database models (internal, may differ from core types)

use chrono::{DateTime, NaiveDateTime, Utc};
use finfancy_core::{Session, User};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Users
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub budget_limit: i32,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            budget_limit: row.budget_limit,
            created_at: row.created_at,
        }
    }
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        UserRow {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            budget_limit: user.budget_limit,
            created_at: user.created_at,
        }
    }
}

// ============================================
// Sessions
// ============================================

/// Session row. Timestamps are naive and hold UTC.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token: row.token.into(),
            user_id: row.user_id,
            created_at: row.created_at.and_utc(),
            expires_at: row.expires_at.and_utc(),
        }
    }
}

impl From<Session> for SessionRow {
    fn from(session: Session) -> Self {
        SessionRow {
            token: session.token.into_inner(),
            user_id: session.user_id,
            created_at: session.created_at.naive_utc(),
            expires_at: session.expires_at.naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_naive_timestamps_are_read_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let row = SessionRow {
            token: "abc".to_string(),
            user_id: Uuid::now_v7(),
            created_at: naive,
            expires_at: naive + Duration::hours(24),
        };

        let session: Session = row.into();
        assert_eq!(session.created_at.naive_utc(), naive);
        assert_eq!(
            session.expires_at.to_rfc3339(),
            "2026-03-02T12:30:00+00:00"
        );
        assert_eq!(session.token.as_str(), "abc");
    }

    #[test]
    fn test_session_row_roundtrip_preserves_instant() {
        let session = Session::issue(Uuid::now_v7(), Utc::now(), Duration::minutes(90)).unwrap();
        let row = SessionRow::from(session.clone());
        let back = Session::from(row);
        assert_eq!(back, session);
    }

    #[test]
    fn test_user_row_conversion() {
        let user = User::new("a@x.com", "$argon2id$...", "Ada", "Lovelace");
        let row = UserRow::from(user.clone());
        assert_eq!(row.budget_limit, 3000);
        assert_eq!(User::from(row), user);
    }
}
