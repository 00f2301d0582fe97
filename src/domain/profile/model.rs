use crate::domain::plan::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing status as reported by the payment provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    Canceled,
    PastDue,
    Unpaid,
    Incomplete,
    #[default]
    None,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Statuses under which the billed tier applies without further checks.
    pub fn is_billable(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            "canceled" | "cancelled" => SubscriptionStatus::Canceled,
            "past_due" => SubscriptionStatus::PastDue,
            "unpaid" => SubscriptionStatus::Unpaid,
            "incomplete" => SubscriptionStatus::Incomplete,
            "" | "none" => SubscriptionStatus::None,
            _ => SubscriptionStatus::Unknown,
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::None => "none",
            SubscriptionStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A user's profile row as far as entitlements are concerned.
///
/// Missing columns map to the `Default` values: free tier, no status,
/// all flags false, no timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub subscription_tier: Tier,
    pub subscription_status: SubscriptionStatus,
    pub subscription_cancel_at_period_end: bool,
    pub subscription_current_period_end: Option<DateTime<Utc>>,
    pub is_trial_active: bool,
    /// Only meaningful while `is_trial_active` is set.
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub manual_pro: bool,
    pub manual_premium: bool,
    pub voice_provider: Option<String>,
}

impl Profile {
    pub fn is_manual(&self) -> bool {
        self.manual_pro || self.manual_premium
    }
}
