//! Bearer-token session management.
//!
//! ARCHITECTURE
//! ============
//! Tokens are opaque 32-byte random hex strings stored in the `sessions`
//! table with an expiry. Validation is a single join against `users`, so a
//! token whose user row has vanished never validates.
//!
//! TRADE-OFFS
//! ==========
//! Expired rows are filtered at read time and removed lazily by a background
//! sweep; a slow sweep only costs table space, never correctness.

use std::fmt::Write;
use std::time::Duration;

use rand::Rng;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use uuid::Uuid;

use super::account::{self, AccountError, PROFILE_COLUMNS, UserProfile};

const SWEEP_INTERVAL: Duration = Duration::from_secs(600);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Cheap shape check so garbage never reaches the database.
#[must_use]
pub fn is_well_formed(token: &str) -> bool {
    token.len() == 64 && token.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Create a session for the given user, returning the token.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_hours: i32) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, now() + make_interval(hours => $3))")
        .bind(&token)
        .bind(user_id)
        .bind(ttl_hours)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user's profile.
///
/// Returns `Ok(None)` for malformed, unknown, or expired tokens.
///
/// # Errors
///
/// Returns an error if the query fails or the user row is unreadable.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<UserProfile>, AccountError> {
    if !is_well_formed(token) {
        return Ok(None);
    }

    let query = format!(
        r"SELECT {PROFILE_COLUMNS}
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()"
    );
    let row = sqlx::query(&query).bind(token).fetch_optional(pool).await?;
    row.as_ref().map(account::profile_from_row).transpose()
}

/// Delete a session by token.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove every expired session, returning how many rows were deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Spawn the background expired-session sweep. Returns a handle for shutdown.
pub fn spawn_session_sweeper(pool: PgPool) -> JoinHandle<()> {
    info!(interval_secs = SWEEP_INTERVAL.as_secs(), "session sweep configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match purge_expired_sessions(&pool).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "purged expired sessions"),
                Err(e) => error!(error = %e, "session purge failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
