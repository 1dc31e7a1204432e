//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the parsed configuration, and the external
//! collaborators (usage data, payment provider) behind trait objects so
//! tests can swap them out.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::checkout::CheckoutProvider;
use crate::services::usage::UsageSource;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    /// Source of dashboard figures.
    pub usage: Arc<dyn UsageSource>,
    /// Optional payment provider. `None` if Stripe is not configured.
    pub checkout: Option<Arc<dyn CheckoutProvider>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        pool: PgPool,
        config: ServerConfig,
        usage: Arc<dyn UsageSource>,
        checkout: Option<Arc<dyn CheckoutProvider>>,
    ) -> Self {
        Self { pool, config: Arc::new(config), usage, checkout }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
