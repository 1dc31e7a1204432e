//! Dashboard usage data sources.
//!
//! DESIGN
//! ======
//! No usage metering exists yet. Handlers depend on the [`UsageSource`]
//! trait so a real metering backend can replace [`UnrecordedUsage`] without
//! touching routes. [`SampleUsage`] serves fixed demonstration figures for
//! marketing screenshots and local development.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("usage source unavailable: {0}")]
    Unavailable(String),
}

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub projects: u32,
    pub api_calls: u64,
    /// Storage used, in gigabytes.
    pub storage: f64,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub title: String,
    pub description: String,
    /// Human-readable relative time, e.g. `"2 hours ago"`.
    pub time: String,
}

/// Response body of the dashboard endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: UsageStats,
    pub recent_activity: Vec<Activity>,
}

/// Provider of per-user dashboard data. Enables mocking in tests.
#[async_trait::async_trait]
pub trait UsageSource: Send + Sync {
    /// Return the dashboard data for a user.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] if the backing store cannot be read.
    async fn dashboard(&self, user_id: Uuid) -> Result<DashboardData, UsageError>;
}

/// Usage is not recorded anywhere yet: every user has zeroed stats.
pub struct UnrecordedUsage;

#[async_trait::async_trait]
impl UsageSource for UnrecordedUsage {
    async fn dashboard(&self, _user_id: Uuid) -> Result<DashboardData, UsageError> {
        Ok(DashboardData::default())
    }
}

/// Fixed demonstration figures, identical for every user.
pub struct SampleUsage;

#[async_trait::async_trait]
impl UsageSource for SampleUsage {
    async fn dashboard(&self, _user_id: Uuid) -> Result<DashboardData, UsageError> {
        Ok(sample_dashboard())
    }
}

fn activity(title: &str, description: &str, time: &str) -> Activity {
    Activity { title: title.to_owned(), description: description.to_owned(), time: time.to_owned() }
}

#[must_use]
pub fn sample_dashboard() -> DashboardData {
    DashboardData {
        stats: UsageStats { projects: 3, api_calls: 1500, storage: 2.5 },
        recent_activity: vec![
            activity("New Project Created", "Project \"E-commerce Website\" was created", "2 hours ago"),
            activity("API Usage", "100 API calls made to Code Assistant", "5 hours ago"),
            activity("Storage Update", "Added 500MB of new files", "1 day ago"),
        ],
    }
}

#[cfg(test)]
#[path = "usage_test.rs"]
mod tests;
