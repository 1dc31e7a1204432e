//! HTTP client for the MNStack API.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is classified into the client taxonomy: authentication
//! failure, not-found, rejected request, or transport failure. Nothing is
//! retried here; the session layer decides what each class means for local
//! state.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::types::{
    BillingCycle, CheckoutRequest, CheckoutSession, DashboardData, ErrorBody, LoginRequest, LoginResponse,
    PlanName, PlanOffer, SignupRequest, User,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Map a non-success HTTP status and body onto [`ApiError`].
pub(crate) fn classify(status: u16, body: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized,
        404 => ApiError::NotFound,
        400..=499 => ApiError::Rejected { status, message: error_message(body) },
        _ => ApiError::Transport(format!("server returned {status}: {}", error_message(body))),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Server operations the client session relies on. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] for bad credentials, or any other class.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Create an account; the server signs it in immediately.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] for invalid fields or a taken email, or any other class.
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Resolve a token to its user profile.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] for an invalid or expired token.
    async fn validate(&self, token: &str) -> Result<User, ApiError>;

    /// Invalidate a token server-side.
    ///
    /// # Errors
    ///
    /// Any error class; callers treat this as best-effort.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// Fetch the caller's dashboard data.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] or [`ApiError::NotFound`] per the server's answer.
    async fn dashboard(&self, token: &str) -> Result<DashboardData, ApiError>;

    /// Fetch the public pricing table.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    async fn plans(&self) -> Result<Vec<PlanOffer>, ApiError>;

    /// Open a hosted checkout for a plan and billing cycle.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`], [`ApiError::Rejected`] for a refused request, or transport failures.
    async fn create_checkout(
        &self,
        token: &str,
        plan: PlanName,
        cycle: BillingCycle,
    ) -> Result<CheckoutSession, ApiError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(format!("invalid response body: {e}")))
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { email, password });
        self.send_json(request).await
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(&SignupRequest { name, email, password });
        self.send_json(request).await
    }

    async fn validate(&self, token: &str) -> Result<User, ApiError> {
        let request = self.http.get(self.url("/api/auth/validate")).bearer_auth(token);
        self.send_json(request).await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/api/auth/logout")).bearer_auth(token);
        self.send(request).await.map(|_| ())
    }

    async fn dashboard(&self, token: &str) -> Result<DashboardData, ApiError> {
        let request = self.http.get(self.url("/api/users/dashboard")).bearer_auth(token);
        self.send_json(request).await
    }

    async fn plans(&self) -> Result<Vec<PlanOffer>, ApiError> {
        self.send_json(self.http.get(self.url("/api/plans"))).await
    }

    async fn create_checkout(
        &self,
        token: &str,
        plan: PlanName,
        cycle: BillingCycle,
    ) -> Result<CheckoutSession, ApiError> {
        let request = self
            .http
            .post(self.url("/api/payments/create-checkout-session"))
            .bearer_auth(token)
            .json(&CheckoutRequest { plan_name: plan, billing_cycle: cycle });
        self.send_json(request).await
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
