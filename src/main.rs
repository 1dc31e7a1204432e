mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::checkout::{CheckoutProvider, StripeCheckout};
use services::usage::{SampleUsage, UnrecordedUsage, UsageSource};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("database init failed");

    // Checkout is optional: purchases answer 503 until Stripe is configured.
    let checkout: Option<Arc<dyn CheckoutProvider>> = match config::StripeConfig::from_env() {
        Some(stripe) => match StripeCheckout::new(stripe, config.frontend_url.clone()) {
            Ok(client) => {
                tracing::info!("stripe checkout enabled");
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "stripe client build failed; checkout disabled");
                None
            }
        },
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set; checkout disabled");
            None
        }
    };

    let usage: Arc<dyn UsageSource> = if config.dashboard_sample_data {
        tracing::info!("dashboard serving sample usage data");
        Arc::new(SampleUsage)
    } else {
        Arc::new(UnrecordedUsage)
    };

    let _sweeper = services::session::spawn_session_sweeper(pool.clone());

    let state = state::AppState::new(pool, config, usage, checkout);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "mnstack listening");
    axum::serve(listener, app).await.expect("server failed");
}
