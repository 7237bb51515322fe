// Authentication extractors
// Decision: Sessions travel only in the session_id cookie
// Decision: Every gate failure is rendered as the same 401 body

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use finfancy_core::{Authenticator, User};
use std::sync::Arc;

use super::config::{AuthConfig, SESSION_COOKIE};
use crate::api::common::ApiError;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub authenticator: Arc<Authenticator>,
}

impl AuthState {
    pub fn new(config: AuthConfig, authenticator: Arc<Authenticator>) -> Self {
        Self {
            config,
            authenticator,
        }
    }
}

/// Authenticated user resolved from the session cookie
/// This is required - returns 401 if not authenticated
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar);

        let user = auth_state.authenticator.resolve_session(token).await?;
        Ok(AuthUser(user))
    }
}

/// Helper trait for extracting AuthState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

/// Session token carried by the request, if any
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}
