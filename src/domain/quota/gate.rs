//! Gate predicates run before a metered action.
//!
//! The predicates read a snapshot of the counters. Calling a gate and then
//! incrementing in a separate statement is not atomic: two concurrent callers
//! can both pass before either increment lands. `QuotaService` closes this
//! for its own consume operations with a conditional update; other callers
//! must accept the possible overrun or do the same.

use super::availability::{generations_allowance, pro_features_allowance};
use crate::domain::plan::{get_plan_limits, resolve_effective_plan, PlanLimits, Tier};
use crate::domain::profile::Profile;
use crate::domain::usage::UsageCounters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The specific limit that denied an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum QuotaDenial {
    #[error("daily generation limit reached")]
    DailyGenerationLimit,
    #[error("weekly generation limit reached")]
    WeeklyGenerationLimit,
    #[error("saved dialogs limit reached")]
    SavedDialogsLimit,
    #[error("daily pro feature limit reached")]
    DailyProFeatureLimit,
    #[error("weekly pro feature limit reached")]
    WeeklyProFeatureLimit,
}

pub(crate) fn check_save_against(
    usage: &UsageCounters,
    limits: &PlanLimits,
) -> Result<(), QuotaDenial> {
    if usage.total_dialogs_count >= limits.max_saved_dialogs {
        return Err(QuotaDenial::SavedDialogsLimit);
    }
    Ok(())
}

pub(crate) fn check_generation_against(
    usage: &UsageCounters,
    limits: &PlanLimits,
) -> Result<(), QuotaDenial> {
    if usage.daily_generations_used >= generations_allowance(usage, limits) {
        return Err(QuotaDenial::DailyGenerationLimit);
    }
    if usage.weekly_generations_used >= limits.generations_weekly_max {
        return Err(QuotaDenial::WeeklyGenerationLimit);
    }
    check_save_against(usage, limits)
}

pub(crate) fn check_pro_features_against(
    usage: &UsageCounters,
    tier: Tier,
    limits: &PlanLimits,
) -> Result<(), QuotaDenial> {
    if tier.is_unmetered() {
        return Ok(());
    }
    if usage.daily_pro_features_used >= pro_features_allowance(usage, limits) {
        return Err(QuotaDenial::DailyProFeatureLimit);
    }
    if usage.weekly_pro_features_used >= limits.pro_features_weekly_max {
        return Err(QuotaDenial::WeeklyProFeatureLimit);
    }
    Ok(())
}

fn resolve(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> (UsageCounters, Tier, PlanLimits) {
    let tier = resolve_effective_plan(profile, now);
    (usage.copied().unwrap_or_default(), tier, get_plan_limits(tier))
}

/// Daily allowance, weekly cap and saved-dialog cap must all have room.
pub fn check_generate_dialog(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> Result<(), QuotaDenial> {
    let (usage, _, limits) = resolve(usage, profile, now);
    check_generation_against(&usage, &limits)
}

pub fn check_use_pro_features(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> Result<(), QuotaDenial> {
    let (usage, tier, limits) = resolve(usage, profile, now);
    check_pro_features_against(&usage, tier, &limits)
}

pub fn check_save_dialog(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> Result<(), QuotaDenial> {
    let (usage, _, limits) = resolve(usage, profile, now);
    check_save_against(&usage, &limits)
}

pub fn can_generate_dialog(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> bool {
    check_generate_dialog(usage, profile, now).is_ok()
}

pub fn can_use_pro_features(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> bool {
    check_use_pro_features(usage, profile, now).is_ok()
}

pub fn can_save_dialog(
    usage: Option<&UsageCounters>,
    profile: Option<&Profile>,
    now: DateTime<Utc>,
) -> bool {
    check_save_dialog(usage, profile, now).is_ok()
}
