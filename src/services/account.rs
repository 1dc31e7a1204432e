//! Account service: signup, credential checks and profile lookup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route handlers call into this module to create users and resolve their
//! public profile. Emails are normalized before they reach the database so
//! the unique index on `users.email` is case-insensitive in practice.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::password::{self, PasswordError};
use super::pricing::Plan;

/// Column list shared by every profile query. `trial_ends` is rendered as
/// RFC 3339 UTC text so the API does not need a datetime crate.
pub(crate) const PROFILE_COLUMNS: &str = r#"id, name, email, plan, subscription_status,
    to_char(trial_ends_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS trial_ends"#;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("name is required")]
    InvalidName,
    #[error("invalid email")]
    InvalidEmail,
    #[error("{0}")]
    WeakPassword(PasswordError),
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("corrupt user record: {0}")]
    CorruptRecord(String),
    #[error("password hashing failed: {0}")]
    Hash(PasswordError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Trial,
}

impl SubscriptionStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "trial" => Some(Self::Trial),
            _ => None,
        }
    }
}

/// Subscription summary included in every profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: Plan,
    pub status: SubscriptionStatus,
    /// RFC 3339 UTC timestamp.
    pub trial_ends: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscription: Subscription,
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

/// Validated signup fields: trimmed name and normalized email.
#[derive(Debug, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
}

/// Check signup fields without touching the database.
///
/// # Errors
///
/// Returns the first field that fails validation.
pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<NewAccount, AccountError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AccountError::InvalidName);
    }
    let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
    password::validate_password_strength(password).map_err(AccountError::WeakPassword)?;
    Ok(NewAccount { name: name.to_owned(), email })
}

pub(crate) fn profile_from_row(row: &PgRow) -> Result<UserProfile, AccountError> {
    let plan_raw: String = row.try_get("plan")?;
    let status_raw: String = row.try_get("subscription_status")?;
    let plan = Plan::parse(&plan_raw).ok_or_else(|| AccountError::CorruptRecord(format!("plan {plan_raw:?}")))?;
    let status = SubscriptionStatus::parse(&status_raw)
        .ok_or_else(|| AccountError::CorruptRecord(format!("subscription status {status_raw:?}")))?;

    Ok(UserProfile {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        subscription: Subscription { plan, status, trial_ends: row.try_get("trial_ends")? },
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Register a new user on the default plan with a fresh trial.
///
/// # Errors
///
/// Returns a validation error, [`AccountError::EmailTaken`] for a duplicate
/// email, or a database/hash failure.
pub async fn signup(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
    trial_days: i32,
) -> Result<UserProfile, AccountError> {
    let account = validate_signup(name, email, password)?;
    let password_hash = password::hash_password(password).map_err(AccountError::Hash)?;

    let query = format!(
        r"INSERT INTO users (id, name, email, password_hash, trial_ends_at)
          VALUES ($1, $2, $3, $4, now() + make_interval(days => $5))
          RETURNING {PROFILE_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(Uuid::new_v4())
        .bind(&account.name)
        .bind(&account.email)
        .bind(password_hash)
        .bind(trial_days)
        .fetch_one(pool)
        .await
        .map_err(|e| if is_unique_violation(&e) { AccountError::EmailTaken } else { AccountError::Db(e) })?;

    let profile = profile_from_row(&row)?;
    tracing::info!(user_id = %profile.id, "account created");
    Ok(profile)
}

/// Check an email/password pair. Unknown emails and wrong passwords are
/// indistinguishable to the caller; a malformed email is a field error.
///
/// # Errors
///
/// Returns [`AccountError::InvalidEmail`] for an unusable email,
/// [`AccountError::InvalidCredentials`] on mismatch, or a database error.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<UserProfile, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;

    let query = format!("SELECT {PROFILE_COLUMNS}, password_hash FROM users WHERE email = $1");
    let Some(row) = sqlx::query(&query).bind(&email).fetch_optional(pool).await? else {
        return Err(AccountError::InvalidCredentials);
    };

    let stored_hash: String = row.try_get("password_hash")?;
    let matches = password::verify_password(password, &stored_hash).map_err(|e| {
        tracing::warn!(error = %e, "stored password hash unreadable");
        AccountError::InvalidCredentials
    })?;
    if !matches {
        return Err(AccountError::InvalidCredentials);
    }

    profile_from_row(&row)
}

/// Load a user's public profile by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is unreadable.
pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>, AccountError> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");
    let row = sqlx::query(&query).bind(user_id).fetch_optional(pool).await?;
    row.as_ref().map(profile_from_row).transpose()
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
