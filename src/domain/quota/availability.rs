use crate::domain::plan::{get_plan_limits, resolve_effective_plan, PlanLimits, UNLIMITED};
use crate::domain::profile::Profile;
use crate::domain::usage::UsageCounters;
use chrono::{DateTime, Utc};

/// Today's ceiling: base grant plus carry-over, capped at the daily max.
fn daily_allowance(base: i32, carry_over: i32, daily_max: i32) -> i32 {
    base.saturating_add(carry_over).min(daily_max)
}

pub fn generations_allowance(usage: &UsageCounters, limits: &PlanLimits) -> i32 {
    daily_allowance(
        limits.generations_base,
        usage.carry_over_generations,
        limits.generations_daily_max,
    )
}

pub fn pro_features_allowance(usage: &UsageCounters, limits: &PlanLimits) -> i32 {
    daily_allowance(
        limits.pro_features_base,
        usage.carry_over_pro_features,
        limits.pro_features_daily_max,
    )
}

fn remaining(allowance: i32, used: i32) -> i32 {
    allowance.saturating_sub(used).max(0)
}

/// Generations left today. The weekly cap is not applied here.
pub fn available_generations_today(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> i32 {
    let limits = get_plan_limits(resolve_effective_plan(profile, now));
    let usage = usage.copied().unwrap_or_default();

    remaining(generations_allowance(&usage, &limits), usage.daily_generations_used)
}

/// Pro features left today; `UNLIMITED` for premium without looking at usage.
pub fn available_pro_features_today(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> i32 {
    let tier = resolve_effective_plan(profile, now);
    if tier.is_unmetered() {
        return UNLIMITED;
    }

    let limits = get_plan_limits(tier);
    let usage = usage.copied().unwrap_or_default();

    remaining(pro_features_allowance(&usage, &limits), usage.daily_pro_features_used)
}
