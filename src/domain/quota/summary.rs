use super::availability::{generations_allowance, pro_features_allowance};
use super::gate::{
    check_generation_against, check_pro_features_against, check_save_against, QuotaDenial,
};
use crate::domain::plan::{get_plan_limits, resolve_effective_plan, Tier, UNLIMITED};
use crate::domain::profile::Profile;
use crate::domain::usage::UsageCounters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One metered dimension as the usage card renders it: `used/base (+carry_over)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDimension {
    pub used_today: i32,
    pub base: i32,
    pub carry_over: i32,
    pub daily_max: i32,
    pub available_today: i32,
    pub weekly_used: i32,
    pub weekly_max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDialogs {
    pub used: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied_by: Option<QuotaDenial>,
}

impl From<Result<(), QuotaDenial>> for GateDecision {
    fn from(result: Result<(), QuotaDenial>) -> Self {
        Self {
            allowed: result.is_ok(),
            denied_by: result.err(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gates {
    pub generate_dialog: GateDecision,
    pub use_pro_features: GateDecision,
    pub save_dialog: GateDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub plan: Tier,
    pub generations: QuotaDimension,
    pub pro_features: QuotaDimension,
    pub saved_dialogs: SavedDialogs,
    pub gates: Gates,
}

/// Everything the usage card needs, computed from one plan resolution.
pub fn usage_summary(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> UsageSummary {
    let plan = resolve_effective_plan(profile, now);
    let limits = get_plan_limits(plan);
    let usage = usage.copied().unwrap_or_default();

    let generations_ceiling = generations_allowance(&usage, &limits);
    let pro_features_available = if plan.is_unmetered() {
        UNLIMITED
    } else {
        pro_features_allowance(&usage, &limits)
            .saturating_sub(usage.daily_pro_features_used)
            .max(0)
    };

    UsageSummary {
        plan,
        generations: QuotaDimension {
            used_today: usage.daily_generations_used,
            base: limits.generations_base,
            carry_over: usage.carry_over_generations,
            daily_max: limits.generations_daily_max,
            available_today: generations_ceiling
                .saturating_sub(usage.daily_generations_used)
                .max(0),
            weekly_used: usage.weekly_generations_used,
            weekly_max: limits.generations_weekly_max,
        },
        pro_features: QuotaDimension {
            used_today: usage.daily_pro_features_used,
            base: limits.pro_features_base,
            carry_over: usage.carry_over_pro_features,
            daily_max: limits.pro_features_daily_max,
            available_today: pro_features_available,
            weekly_used: usage.weekly_pro_features_used,
            weekly_max: limits.pro_features_weekly_max,
        },
        saved_dialogs: SavedDialogs {
            used: usage.total_dialogs_count,
            max: limits.max_saved_dialogs,
        },
        gates: Gates {
            generate_dialog: check_generation_against(&usage, &limits).into(),
            use_pro_features: check_pro_features_against(&usage, plan, &limits).into(),
            save_dialog: check_save_against(&usage, &limits).into(),
        },
    }
}
