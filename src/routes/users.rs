//! Dashboard routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use super::auth::AuthUser;
use super::error_response;
use crate::services::account;
use crate::services::usage::UsageSource;
use crate::state::AppState;

/// Resolve dashboard data from the configured usage source.
pub(crate) async fn load_dashboard(usage: &dyn UsageSource, user_id: Uuid) -> Response {
    match usage.dashboard(user_id).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            tracing::error!(error = %e, %user_id, "dashboard data unavailable");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
    }
}

/// `GET /api/users/dashboard`: usage stats and recent activity for the caller.
pub async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> Response {
    match account::find_profile(&state.pool, auth.user.id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!(error = %e, user_id = %auth.user.id, "user lookup failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
        }
    }

    load_dashboard(state.usage.as_ref(), auth.user.id).await
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
