//! Auth routes for signup, login, bearer-token validation and logout.

use axum::extract::{FromRef, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::services::account::{self, AccountError, UserProfile};
use crate::services::session;
use crate::state::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively; an empty token counts as absent.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserProfile,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(error_response(StatusCode::UNAUTHORIZED, "missing bearer token"));
        };

        let app_state = AppState::from_ref(state);
        match session::validate_session(&app_state.pool, token).await {
            Ok(Some(user)) => Ok(Self { user, token: token.to_owned() }),
            Ok(None) => Err(error_response(StatusCode::UNAUTHORIZED, "invalid or expired token")),
            Err(e) => {
                tracing::error!(error = %e, "session validation failed");
                Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error"))
            }
        }
    }
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued token plus the profile it resolves to.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

pub(crate) fn account_error_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::InvalidName | AccountError::InvalidEmail | AccountError::WeakPassword(_) => {
            StatusCode::BAD_REQUEST
        }
        AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AccountError::CorruptRecord(_) | AccountError::Hash(_) | AccountError::Db(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn account_error_response(err: AccountError) -> Response {
    let status = account_error_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "account operation failed");
        return error_response(status, "Server error");
    }
    error_response(status, err.to_string())
}

async fn issue_token(state: &AppState, user: UserProfile, status: StatusCode) -> Response {
    match session::create_session(&state.pool, user.id, state.config.session_ttl_hours).await {
        Ok(token) => (status, Json(AuthResponse { token, user })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "session creation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/signup`: create an account and sign it in.
pub async fn signup(State(state): State<AppState>, Json(body): Json<SignupRequest>) -> Response {
    match account::signup(&state.pool, &body.name, &body.email, &body.password, state.config.trial_days).await {
        Ok(user) => issue_token(&state, user, StatusCode::CREATED).await,
        Err(e) => account_error_response(e),
    }
}

/// `POST /api/auth/login`: exchange credentials for a bearer token.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    match account::authenticate(&state.pool, &body.email, &body.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "login succeeded");
            issue_token(&state, user, StatusCode::OK).await
        }
        Err(e) => account_error_response(e),
    }
}

/// `GET /api/auth/validate`: return the profile the bearer token maps to.
pub async fn validate(auth: AuthUser) -> Json<UserProfile> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete the presented session.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::error!(error = %e, user_id = %auth.user.id, "session delete failed");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
