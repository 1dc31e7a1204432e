//! Pricing and checkout routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;
use super::error_response;
use crate::services::account::UserProfile;
use crate::services::checkout::{CheckoutProvider, CheckoutRequest};
use crate::services::pricing::{self, BillingCycle, Plan, PlanOffer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub plan_name: Plan,
    pub billing_cycle: BillingCycle,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub id: String,
}

/// `GET /api/plans`: the public pricing table.
pub async fn plans() -> Json<Vec<PlanOffer>> {
    Json(pricing::catalog())
}

/// Open a hosted checkout for `user`, or explain why not.
pub(crate) async fn start_checkout(
    provider: Option<&dyn CheckoutProvider>,
    user: &UserProfile,
    body: &CreateCheckoutRequest,
) -> Response {
    let Some(provider) = provider else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Payments not configured");
    };

    let request = CheckoutRequest {
        user_id: user.id,
        email: user.email.clone(),
        plan: body.plan_name,
        cycle: body.billing_cycle,
    };
    match provider.create_session(&request).await {
        Ok(id) => {
            tracing::info!(user_id = %user.id, plan = body.plan_name.as_str(), cycle = body.billing_cycle.as_str(), "checkout session created");
            Json(CheckoutResponse { id }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "checkout session creation failed");
            error_response(StatusCode::BAD_GATEWAY, "Payment provider error")
        }
    }
}

/// `POST /api/payments/create-checkout-session`: start a subscription purchase.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateCheckoutRequest>,
) -> Response {
    start_checkout(state.checkout.as_deref(), &auth.user, &body).await
}

#[cfg(test)]
#[path = "payments_test.rs"]
mod tests;
