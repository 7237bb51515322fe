// Error types for the authentication core

use thiserror::Error;

/// Result type alias for authenticator operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors reported by UserStore / SessionStore implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violated (user email or session token)
    #[error("duplicate key")]
    DuplicateKey,

    /// Connectivity or backend failure
    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a backend error from any displayable message
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(anyhow::anyhow!(msg.into()))
    }
}

/// Errors that can occur during authentication
///
/// `NotAuthenticated`, `InvalidSession`, `SessionExpired` and `UserNotFound` are
/// internal bookkeeping. Transports must render all four identically.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration with an email that is already taken
    #[error("Email already registered")]
    DuplicateUser,

    /// Unknown email or wrong password (never says which)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No session token presented
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Token does not match any stored session
    #[error("Invalid session")]
    InvalidSession,

    /// Session found but its expiry has passed
    #[error("Session expired")]
    SessionExpired,

    /// Session owner no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Registration input rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store connectivity failure, distinct from the taxonomy above
    #[error("Store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),

    /// Internal error (e.g. hashing library failure)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AuthError::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        AuthError::Internal(msg.into())
    }

    /// True for the failures of the session gate
    pub fn is_session_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated
                | AuthError::InvalidSession
                | AuthError::SessionExpired
                | AuthError::UserNotFound
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            // Callers that expect a duplicate map it themselves before `?`
            StoreError::DuplicateKey => AuthError::internal("unexpected duplicate key"),
            StoreError::Backend(e) => AuthError::Unavailable(e),
        }
    }
}
