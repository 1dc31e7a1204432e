//! Client session lifecycle.
//!
//! DESIGN
//! ======
//! `SessionContext` is the single owner of the bearer token and the resolved
//! user. Commands receive it explicitly; there is no process-global session.
//!
//! States move as follows:
//!
//! ```text
//! Anonymous --restore(stored token)--> Validating --ok--> Authenticated
//!                                          |
//!                                          +--failure--> Anonymous
//! Anonymous --login/signup--> Authenticated --logout--> Anonymous
//! ```
//!
//! Any gated call answered with `Unauthorized` discards the token and drops
//! back to `Anonymous`. Not-found and transport failures leave state alone.

use crate::api::{ApiError, AuthApi};
use crate::store::{StoreError, TokenStore};
use crate::types::{BillingCycle, CheckoutSession, DashboardData, PlanName, PlanOffer, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Validating,
    Authenticated(User),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }
}

pub struct SessionContext<A: AuthApi, S: TokenStore> {
    api: A,
    store: S,
    state: SessionState,
    token: Option<String>,
}

impl<A: AuthApi, S: TokenStore> SessionContext<A, S> {
    /// Start anonymous; call [`Self::restore`] to pick up a stored token.
    pub fn new(api: A, store: S) -> Self {
        Self { api, store, state: SessionState::Anonymous, token: None }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Validate a previously stored token against the server.
    ///
    /// Without a stored token this is a no-op. A rejected token is cleared
    /// from the store. On other failures the session stays anonymous but the
    /// stored token is kept for the next attempt.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the store cannot be read or validation
    /// fails for any reason.
    pub async fn restore(&mut self) -> Result<&SessionState, SessionError> {
        let Some(token) = self.store.load()? else {
            self.state = SessionState::Anonymous;
            return Ok(&self.state);
        };

        self.state = SessionState::Validating;
        match self.api.validate(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "stored token validated");
                self.token = Some(token);
                self.state = SessionState::Authenticated(user);
                Ok(&self.state)
            }
            Err(ApiError::Unauthorized) => {
                tracing::info!("stored token rejected; signing out");
                self.expire()?;
                Err(ApiError::Unauthorized.into())
            }
            Err(e) => {
                tracing::warn!(error = %e, "token validation unavailable");
                self.token = None;
                self.state = SessionState::Anonymous;
                Err(e.into())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`SessionError`] if the server rejects the credentials or the
    /// token cannot be persisted.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, SessionError> {
        let response = self.api.login(email, password).await?;
        self.adopt(response.token, response.user)
    }

    /// # Errors
    ///
    /// Returns [`SessionError`] if the server rejects the signup or the
    /// token cannot be persisted.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<User, SessionError> {
        let response = self.api.signup(name, email, password).await?;
        self.adopt(response.token, response.user)
    }

    fn adopt(&mut self, token: String, user: User) -> Result<User, SessionError> {
        self.store.save(&token)?;
        self.token = Some(token);
        self.state = SessionState::Authenticated(user.clone());
        Ok(user)
    }

    /// Drop the session locally. The server is told first, best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the stored token cannot be removed.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let token = match self.token.take() {
            Some(token) => Some(token),
            None => self.store.load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored token unreadable; clearing local session only");
                None
            }),
        };
        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "server logout failed; discarding token locally");
            }
        }
        self.expire()
    }

    /// Forget the token and return to anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the stored token cannot be removed.
    pub fn expire(&mut self) -> Result<(), SessionError> {
        self.token = None;
        self.state = SessionState::Anonymous;
        self.store.clear()?;
        Ok(())
    }

    fn bearer(&self) -> Result<String, SessionError> {
        self.token.clone().ok_or(SessionError::Api(ApiError::Unauthorized))
    }

    fn on_gated_error(&mut self, err: ApiError) -> SessionError {
        if matches!(err, ApiError::Unauthorized) {
            tracing::info!("server rejected session token; signing out");
            if let Err(store_err) = self.expire() {
                return store_err;
            }
        }
        err.into()
    }

    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] without a session (no request is sent), or
    /// whatever the server answers.
    pub async fn dashboard(&mut self) -> Result<DashboardData, SessionError> {
        let token = self.bearer()?;
        match self.api.dashboard(&token).await {
            Ok(data) => Ok(data),
            Err(e) => Err(self.on_gated_error(e)),
        }
    }

    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] without a session (no request is sent), or
    /// whatever the server answers.
    pub async fn checkout(&mut self, plan: PlanName, cycle: BillingCycle) -> Result<CheckoutSession, SessionError> {
        let token = self.bearer()?;
        match self.api.create_checkout(&token, plan, cycle).await {
            Ok(session) => Ok(session),
            Err(e) => Err(self.on_gated_error(e)),
        }
    }

    /// Public pricing table; needs no session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Api`] on transport failure.
    pub async fn plans(&self) -> Result<Vec<PlanOffer>, SessionError> {
        Ok(self.api.plans().await?)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
