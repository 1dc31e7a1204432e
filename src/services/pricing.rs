//! Static plan catalog and price lookup.
//!
//! Prices are integer cents. Yearly billing is twelve months at a 20%
//! discount, precomputed so the table matches what customers see.

use serde::{Deserialize, Serialize};

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    Starter,
    Professional,
    Enterprise,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Starter, Plan::Professional, Plan::Enterprise];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "Starter",
            Self::Professional => "Professional",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Parse the stored column value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == raw)
    }
}

/// How often the customer is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Stripe recurring interval for this cycle.
    #[must_use]
    pub fn interval(self) -> &'static str {
        match self {
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

/// One entry of the public pricing table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOffer {
    pub name: Plan,
    pub monthly_cents: u64,
    pub yearly_cents: u64,
    pub features: &'static [&'static str],
    pub recommended: bool,
}

const STARTER_FEATURES: &[&str] = &[
    "AI Code Assistant",
    "Basic Analytics",
    "5 Projects",
    "Community Support",
    "Basic Debugging Tools",
];

const PROFESSIONAL_FEATURES: &[&str] = &[
    "Everything in Starter",
    "Advanced Analytics",
    "Unlimited Projects",
    "Priority Support",
    "Team Collaboration",
    "Advanced Debugging",
    "Deployment Automation",
];

const ENTERPRISE_FEATURES: &[&str] = &[
    "Everything in Professional",
    "Custom AI Models",
    "Dedicated Support",
    "SLA Guarantee",
    "Custom Integrations",
    "Advanced Security",
    "On-premise Option",
];

/// Price in cents for a plan and billing cycle.
#[must_use]
pub fn price_cents(plan: Plan, cycle: BillingCycle) -> u64 {
    match (plan, cycle) {
        (Plan::Starter, BillingCycle::Monthly) => 2_900,
        (Plan::Starter, BillingCycle::Yearly) => 27_840,
        (Plan::Professional, BillingCycle::Monthly) => 7_900,
        (Plan::Professional, BillingCycle::Yearly) => 75_840,
        (Plan::Enterprise, BillingCycle::Monthly) => 29_900,
        (Plan::Enterprise, BillingCycle::Yearly) => 287_040,
    }
}

/// The full pricing table in display order.
#[must_use]
pub fn catalog() -> Vec<PlanOffer> {
    Plan::ALL
        .into_iter()
        .map(|plan| PlanOffer {
            name: plan,
            monthly_cents: price_cents(plan, BillingCycle::Monthly),
            yearly_cents: price_cents(plan, BillingCycle::Yearly),
            features: match plan {
                Plan::Starter => STARTER_FEATURES,
                Plan::Professional => PROFESSIONAL_FEATURES,
                Plan::Enterprise => ENTERPRISE_FEATURES,
            },
            recommended: plan == Plan::Professional,
        })
        .collect()
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
