// Budget limit API routes
// Decision: Only the monthly limit is exposed; no spending aggregation

use axum::{extract::State, routing::get, Json, Router};
use finfancy_core::{AuthError, UserStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{ApiError, ErrorResponse};
use crate::auth::middleware::{AuthState, AuthUser, FromRef};

/// Largest accepted budget limit
pub const MAX_BUDGET_LIMIT: i64 = 1_000_000;

/// App state for budget routes
#[derive(Clone)]
pub struct BudgetState {
    pub users: Arc<dyn UserStore>,
    pub auth: AuthState,
}

impl FromRef<BudgetState> for AuthState {
    fn from_ref(input: &BudgetState) -> Self {
        input.auth.clone()
    }
}

/// Budget limit of the current user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetLimit {
    #[schema(example = 3000)]
    pub limit: i64,
}

/// Create budget routes
pub fn routes(state: BudgetState) -> Router {
    Router::new()
        .route("/budget/limit", get(get_budget_limit).put(update_budget_limit))
        .with_state(state)
}

/// GET /budget/limit - Current user's budget limit
#[utoipa::path(
    get,
    path = "/budget/limit",
    responses(
        (status = 200, description = "Current budget limit", body = BudgetLimit),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "budget"
)]
pub async fn get_budget_limit(AuthUser(user): AuthUser) -> Json<BudgetLimit> {
    Json(BudgetLimit {
        limit: i64::from(user.budget_limit),
    })
}

/// PUT /budget/limit - Replace the current user's budget limit
#[utoipa::path(
    put,
    path = "/budget/limit",
    request_body = BudgetLimit,
    responses(
        (status = 200, description = "Updated budget limit", body = BudgetLimit),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 422, description = "Limit out of range", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "budget"
)]
pub async fn update_budget_limit(
    State(state): State<BudgetState>,
    AuthUser(user): AuthUser,
    Json(req): Json<BudgetLimit>,
) -> Result<Json<BudgetLimit>, ApiError> {
    let limit = validate_limit(req.limit)?;

    let updated = state
        .users
        .update_budget_limit(user.id, limit)
        .await
        .map_err(AuthError::from)?;

    if !updated {
        // User deleted between resolution and update
        return Err(AuthError::UserNotFound.into());
    }

    tracing::info!(user_id = %user.id, limit, "Updated budget limit");
    Ok(Json(BudgetLimit {
        limit: i64::from(limit),
    }))
}

fn validate_limit(limit: i64) -> Result<i32, ApiError> {
    if !(0..=MAX_BUDGET_LIMIT).contains(&limit) {
        return Err(ApiError::unprocessable(format!(
            "limit must be between 0 and {}",
            MAX_BUDGET_LIMIT
        )));
    }
    i32::try_from(limit).map_err(|_| ApiError::unprocessable("limit out of range"))
}
