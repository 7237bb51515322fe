// Authentication HTTP routes
// Decision: Paths are relative (/auth/*); the app nests them under API_V1_STR
// Decision: Login issues a cookie only, the body never carries the token

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use finfancy_core::{IssuedSession, Registration};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    config::{AuthConfig, SESSION_COOKIE},
    middleware::{session_token, AuthState, AuthUser},
};
use crate::api::common::{ApiError, ErrorResponse, MessageResponse};

/// Register request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "user@example.com")]
    pub email: String,
    /// At least 8 characters
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "user@example.com")]
    pub email: String,
    pub password: String,
}

/// User info response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserInfoResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub budget_limit: i32,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(get_current_user))
        .with_state(state)
}

/// POST /auth/register - Create an account (does not log in)
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.authenticator.register(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /auth/login - Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = MessageResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let issued = state
        .authenticator
        .login(&req.email, &req.password)
        .await?;

    let cookie = session_cookie(&state.config, issued);

    Ok((
        jar.add(cookie),
        Json(MessageResponse::new("Login successful")),
    ))
}

/// POST /auth/logout - Delete the session and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let token = session_token(&jar).map(str::to_owned);

    // The cookie is cleared even when the store could not be reached
    if let Err(e) = state.authenticator.logout(token.as_deref()).await {
        tracing::warn!("Failed to delete session on logout: {}", e);
    }

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// GET /auth/me - Get current user info
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserInfoResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn get_current_user(AuthUser(user): AuthUser) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        id: user.id.to_string(),
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        budget_limit: user.budget_limit,
    })
}

/// Build the session cookie for a freshly issued session
fn session_cookie(config: &AuthConfig, issued: IssuedSession) -> Cookie<'static> {
    let max_age = time::Duration::seconds(issued.max_age_secs());

    Cookie::build((SESSION_COOKIE, issued.token.into_inner()))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}
