//! Server configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads an optional `.env` via `dotenvy` and then builds a typed
//! `ServerConfig`. Optional integrations (Stripe checkout) have their own
//! loaders that return `None` when unconfigured so the feature is disabled
//! instead of failing startup.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_TTL_HOURS: i32 = 24 * 7;
pub const DEFAULT_TRIAL_DAYS: i32 = 14;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Parse a boolean-ish value (`1/true/yes/on`, `0/false/no/off`).
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn positive(key: &'static str, value: i32) -> Result<i32, ConfigError> {
    if value > 0 { Ok(value) } else { Err(ConfigError::Invalid { key, value: value.to_string() }) }
}

/// Top-level server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    /// Lifetime of a freshly issued bearer token.
    pub session_ttl_hours: i32,
    /// Trial length granted at signup.
    pub trial_days: i32,
    /// Base URL of the customer-facing site; checkout redirects land here.
    pub frontend_url: String,
    /// Static marketing pages served at `/` when set.
    pub website_dir: Option<PathBuf>,
    /// Serve demonstration dashboard figures instead of zeroed stats.
    pub dashboard_sample_data: bool,
}

impl ServerConfig {
    /// Build from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SESSION_TTL_HOURS`: default 168
    /// - `TRIAL_DAYS`: default 14
    /// - `FRONTEND_URL`: default `http://localhost:5173`
    /// - `WEBSITE_DIR`: unset disables static pages
    /// - `DASHBOARD_SAMPLE_DATA`: default false
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let session_ttl_hours = positive("SESSION_TTL_HOURS", env_parse("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?)?;
        let trial_days = positive("TRIAL_DAYS", env_parse("TRIAL_DAYS", DEFAULT_TRIAL_DAYS)?)?;
        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let website_dir = std::env::var("WEBSITE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let dashboard_sample_data = match std::env::var("DASHBOARD_SAMPLE_DATA") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { key: "DASHBOARD_SAMPLE_DATA", value: raw })?,
            Err(_) => false,
        };

        Ok(Self {
            database_url,
            port,
            session_ttl_hours,
            trial_days,
            frontend_url,
            website_dir,
            dashboard_sample_data,
        })
    }
}

/// Stripe credentials for hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl StripeConfig {
    /// Load from `STRIPE_SECRET_KEY` and optional `STRIPE_API_BASE`.
    /// Returns `None` if the key is missing (checkout will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let api_base = std::env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Some(Self { secret_key, api_base })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
