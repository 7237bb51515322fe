// Session domain entity and opaque session tokens

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Number of random bytes in a session token (hex-encoded to 64 chars)
const TOKEN_BYTES: usize = 32;

/// Opaque, unguessable session token.
///
/// Carries no claims; it is only a lookup key into the session store.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().gen();
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// Tokens are credentials; keep them out of logs
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// A persisted login session.
///
/// References its user by id; the session does not own the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for `user_id` that expires `lifetime` after `now`.
    ///
    /// Returns `None` when the expiry is not representable.
    pub fn issue(user_id: Uuid, now: DateTime<Utc>, lifetime: chrono::Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(lifetime)?;
        Some(Self {
            token: SessionToken::generate(),
            user_id,
            created_at: now,
            expires_at,
        })
    }

    /// A session is valid only while its expiry is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Result of a successful login, handed to the transport layer
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
    /// Cookie lifetime matching the stored expiry
    pub max_age: Duration,
}

impl IssuedSession {
    /// Cookie Max-Age in seconds, saturating at `i64::MAX`
    pub fn max_age_secs(&self) -> i64 {
        i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX)
    }
}
