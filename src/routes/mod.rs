//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` and, when `WEBSITE_DIR` is
//! configured, serves the static marketing pages (home, features, pricing)
//! as the fallback for every other path.

pub mod auth;
pub mod payments;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// JSON error body shared by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { message: message.into() })).into_response()
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/validate", get(auth::validate))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/dashboard", get(users::dashboard))
        .route("/api/plans", get(payments::plans))
        .route("/api/payments/create-checkout-session", post(payments::create_checkout_session))
        .route("/healthz", get(healthz))
}

/// Full application router: API, middleware, and optional static site.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = api_routes();
    if let Some(dir) = &state.config.website_dir {
        tracing::info!(dir = %dir.display(), "serving static site");
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
