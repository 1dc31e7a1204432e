//! Postgres pool and schema.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two tables back the service: `users` (profile, argon2 hash, plan and
//! trial window) and `sessions` (bearer tokens with an expiry, cascading on
//! user delete). Migrations under `src/db/migrations` are embedded and run
//! before the router starts accepting requests.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool size from a raw `DB_MAX_CONNECTIONS` value; zero or junk falls back
/// to the default.
pub(crate) fn max_connections(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Connect to Postgres and bring the `users`/`sessions` schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let max = max_connections(std::env::var("DB_MAX_CONNECTIONS").ok().as_deref());
    let pool = PgPoolOptions::new()
        .max_connections(max)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    tracing::info!(max_connections = max, "database ready");

    Ok(pool)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
