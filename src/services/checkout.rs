//! Hosted checkout session creation.
//!
//! Thin wrapper over Stripe's `/v1/checkout/sessions`. Form building and
//! response parsing are pure functions for testability; the trait lets
//! route tests substitute a mock provider.

use std::time::Duration;

use uuid::Uuid;

use super::pricing::{self, BillingCycle, Plan};
use crate::config::StripeConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const CURRENCY: &str = "usd";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("checkout request failed: {0}")]
    Request(String),
    #[error("checkout provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("unexpected checkout response: {0}")]
    Response(String),
}

/// A pending subscription purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
    pub email: String,
    pub plan: Plan,
    pub cycle: BillingCycle,
}

/// Payment provider able to open a hosted checkout session.
#[async_trait::async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session and return its provider identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if the provider call fails or answers with
    /// an unexpected body.
    async fn create_session(&self, request: &CheckoutRequest) -> Result<String, CheckoutError>;
}

// =============================================================================
// STRIPE
// =============================================================================

pub struct StripeCheckout {
    http: reqwest::Client,
    secret_key: String,
    sessions_url: String,
    frontend_url: String,
}

impl StripeCheckout {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: StripeConfig, frontend_url: String) -> Result<Self, CheckoutError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CheckoutError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            secret_key: config.secret_key,
            sessions_url: format!("{}/v1/checkout/sessions", config.api_base),
            frontend_url,
        })
    }
}

#[async_trait::async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<String, CheckoutError> {
        let form = checkout_form(request, &self.frontend_url);

        let response = self
            .http
            .post(&self.sessions_url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| CheckoutError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CheckoutError::Request(e.to_string()))?;

        if status != 200 {
            return Err(CheckoutError::Provider { status, body: text });
        }
        parse_session_id(&text)
    }
}

/// Build the form-encoded body for a subscription checkout session.
#[must_use]
pub fn checkout_form(request: &CheckoutRequest, frontend_url: &str) -> Vec<(&'static str, String)> {
    let amount = pricing::price_cents(request.plan, request.cycle);
    vec![
        ("mode", "subscription".to_owned()),
        ("payment_method_types[0]", "card".to_owned()),
        ("line_items[0][quantity]", "1".to_owned()),
        ("line_items[0][price_data][currency]", CURRENCY.to_owned()),
        ("line_items[0][price_data][unit_amount]", amount.to_string()),
        ("line_items[0][price_data][recurring][interval]", request.cycle.interval().to_owned()),
        ("line_items[0][price_data][product_data][name]", format!("{} Plan", request.plan.as_str())),
        (
            "line_items[0][price_data][product_data][description]",
            format!("{} billing", request.cycle.as_str()),
        ),
        ("customer_email", request.email.clone()),
        ("client_reference_id", request.user_id.to_string()),
        ("success_url", format!("{frontend_url}/dashboard?success=true")),
        ("cancel_url", format!("{frontend_url}/pricing?canceled=true")),
    ]
}

/// Extract the session `id` from a provider response body.
///
/// # Errors
///
/// Returns [`CheckoutError::Response`] if the body is not JSON or lacks an id.
pub fn parse_session_id(body: &str) -> Result<String, CheckoutError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| CheckoutError::Response(format!("invalid JSON: {e}")))?;
    value
        .get("id")
        .and_then(serde_json::Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| CheckoutError::Response("missing session id".into()))
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
