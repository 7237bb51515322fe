// Authenticator: registration, login, logout and session resolution
//
// The authenticator holds no mutable state of its own. Everything lives in the
// injected stores, so one instance is shared (via Arc) by all request handlers.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AuthError, Result, StoreError};
use crate::password::{dummy_digest, hash_password, needs_rehash, verify_password};
use crate::session::{IssuedSession, Session};
use crate::traits::{SessionStore, UserStore};
use crate::user::User;
use crate::validation::{normalize_email, validate_email, validate_name, validate_password};

/// Registration input as received from the transport
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Session-based authenticator
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    session_lifetime: Duration,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        session_lifetime: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            session_lifetime,
        }
    }

    /// Lifetime given to every new session
    pub fn session_lifetime(&self) -> Duration {
        self.session_lifetime
    }

    /// Register a new user. No session is issued.
    pub async fn register(&self, input: Registration) -> Result<()> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        validate_password(&input.password)?;
        let first_name = validate_name("first_name", &input.first_name)?;
        let last_name = validate_name("last_name", &input.last_name)?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(email, password_hash, first_name, last_name);
        let user_id = user.id;

        // The insert is the authoritative uniqueness gate; the lookup above only
        // short-circuits the common case.
        match self.users.insert_user(user).await {
            Ok(()) => {
                info!(user_id = %user_id, "User registered");
                Ok(())
            }
            Err(StoreError::DuplicateKey) => {
                debug!("Registration lost a race on email uniqueness");
                Err(AuthError::DuplicateUser)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and issue a new session
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            // Same amount of hashing work as a wrong password
            let _ = verify_password(password, dummy_digest());
            debug!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if needs_rehash(&user.password_hash) {
            debug!(user_id = %user.id, "Password digest uses outdated parameters");
        }

        let lifetime = chrono::Duration::from_std(self.session_lifetime)
            .map_err(|_| AuthError::internal("session lifetime out of range"))?;
        let session = Session::issue(user.id, Utc::now(), lifetime)
            .ok_or_else(|| AuthError::internal("session expiry out of range"))?;

        let issued = IssuedSession {
            token: session.token.clone(),
            expires_at: session.expires_at,
            max_age: self.session_lifetime,
        };

        self.sessions.insert_session(session).await?;
        info!(user_id = %user.id, expires_at = %issued.expires_at, "Session issued");

        Ok(issued)
    }

    /// Resolve the user behind a presented session token.
    ///
    /// This is the gate in front of every protected operation. The only side
    /// effect is purging a session found to be expired.
    pub async fn resolve_session(&self, token: Option<&str>) -> Result<User> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(AuthError::NotAuthenticated),
        };

        let session = self
            .sessions
            .find_session_by_token(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if session.is_expired_at(Utc::now()) {
            // Best effort: a concurrent request may already have removed it
            match self.sessions.delete_session_by_token(token).await {
                Ok(_) => debug!(user_id = %session.user_id, "Expired session purged"),
                Err(e) => warn!(user_id = %session.user_id, "Failed to purge expired session: {}", e),
            }
            return Err(AuthError::SessionExpired);
        }

        self.users
            .find_user_by_id(session.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Revoke a session. Absent or unknown tokens are not an error.
    pub async fn logout(&self, token: Option<&str>) -> Result<()> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let removed = self.sessions.delete_session_by_token(token).await?;
            debug!(removed, "Session revoked");
        }
        Ok(())
    }

    /// Remove every expired session (passive sweep, not relied upon for correctness)
    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        Ok(self.sessions.delete_expired(Utc::now()).await?)
    }
}
