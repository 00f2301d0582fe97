use serde::{Deserialize, Serialize};

/// Finite stand-in for "unlimited" quota. Arithmetic on it must saturate.
pub const UNLIMITED: i32 = 999_999;

pub const VOICE_PROVIDER_BROWSER: &str = "browser";
pub const VOICE_PROVIDER_ELEVENLABS: &str = "elevenlabs";

/// Subscription level, both as billed and as effectively resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Premium => "premium",
        }
    }

    /// Premium pro-feature usage is not metered.
    pub fn is_unmetered(&self) -> bool {
        *self == Tier::Premium
    }
}

/// Unrecognized tier strings fall back to free.
impl From<&str> for Tier {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pro" => Tier::Pro,
            "premium" => Tier::Premium,
            _ => Tier::Free,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static quota configuration for a tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    /// Generations granted per day before carry-over.
    pub generations_base: i32,
    /// Ceiling on base + carry-over generations for a single day.
    pub generations_daily_max: i32,
    pub generations_weekly_max: i32,
    pub pro_features_base: i32,
    pub pro_features_daily_max: i32,
    pub pro_features_weekly_max: i32,
    pub max_saved_dialogs: i32,
    pub voice_provider: String,
    pub stats_enabled: bool,
}

/// Get the limits for a tier.
///
/// | Field | free | pro | premium |
/// |---|---|---|---|
/// | generations base / daily max / weekly max | 2 / 4 / 10 | 5 / 10 / 25 | 10 / 20 / 50 |
/// | pro features base / daily max / weekly max | 4 / 8 / 20 | 10 / 20 / 50 | unlimited |
/// | saved dialogs | 4 | 10 | 50 |
/// | voice provider | browser | browser | elevenlabs |
/// | stats | no | yes | yes |
pub fn get_plan_limits(tier: Tier) -> PlanLimits {
    match tier {
        Tier::Free => PlanLimits {
            generations_base: 2,
            generations_daily_max: 4,
            generations_weekly_max: 10,
            pro_features_base: 4,
            pro_features_daily_max: 8,
            pro_features_weekly_max: 20,
            max_saved_dialogs: 4,
            voice_provider: VOICE_PROVIDER_BROWSER.to_string(),
            stats_enabled: false,
        },
        Tier::Pro => PlanLimits {
            generations_base: 5,
            generations_daily_max: 10,
            generations_weekly_max: 25,
            pro_features_base: 10,
            pro_features_daily_max: 20,
            pro_features_weekly_max: 50,
            max_saved_dialogs: 10,
            voice_provider: VOICE_PROVIDER_BROWSER.to_string(),
            stats_enabled: true,
        },
        Tier::Premium => PlanLimits {
            generations_base: 10,
            generations_daily_max: 20,
            generations_weekly_max: 50,
            pro_features_base: UNLIMITED,
            pro_features_daily_max: UNLIMITED,
            pro_features_weekly_max: UNLIMITED,
            max_saved_dialogs: 50,
            voice_provider: VOICE_PROVIDER_ELEVENLABS.to_string(),
            stats_enabled: true,
        },
    }
}
