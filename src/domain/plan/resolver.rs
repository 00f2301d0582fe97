use super::model::{get_plan_limits, PlanLimits, Tier};
use crate::domain::profile::Profile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Plan information in the shape the settings and profile screens show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub plan: Tier,
    pub limits: PlanLimits,
    pub is_manual: bool,
    pub is_trial: bool,
    pub display_name: String,
}

/// A trial counts only while the flag is set and its end lies in the future.
pub fn is_trial_valid(profile: Option<&Profile>, now: DateTime<Utc>) -> bool {
    match profile {
        Some(p) if p.is_trial_active => p.trial_ends_at.is_some_and(|ends_at| now < ends_at),
        _ => false,
    }
}

/// Determine the tier a user is entitled to right now.
///
/// Precedence, first match wins:
/// 1. no profile: free
/// 2. manual premium override
/// 3. manual pro override
/// 4. valid trial: pro
/// 5. active or trialing subscription: billed tier
/// 6. cancellation pending but period not over yet: billed tier
/// 7. billed tier
pub fn resolve_effective_plan(profile: Option<&Profile>, now: DateTime<Utc>) -> Tier {
    let Some(profile) = profile else {
        return Tier::Free;
    };

    if profile.manual_premium {
        return Tier::Premium;
    }
    if profile.manual_pro {
        return Tier::Pro;
    }

    if is_trial_valid(Some(profile), now) {
        return Tier::Pro;
    }

    if profile.subscription_status.is_billable() {
        return profile.subscription_tier;
    }

    let in_grace_period = profile.subscription_cancel_at_period_end
        && profile
            .subscription_current_period_end
            .is_some_and(|period_end| period_end > now);
    if in_grace_period {
        return profile.subscription_tier;
    }

    profile.subscription_tier
}

pub fn has_stats_access(profile: Option<&Profile>, now: DateTime<Utc>) -> bool {
    get_plan_limits(resolve_effective_plan(profile, now)).stats_enabled
}

/// Voice provider to use: the user's own choice on paid tiers, else the tier default.
pub fn voice_provider_for(profile: Option<&Profile>, now: DateTime<Utc>) -> String {
    let plan = resolve_effective_plan(profile, now);

    let preferred = profile
        .and_then(|p| p.voice_provider.as_deref())
        .filter(|provider| !provider.is_empty());

    match (plan, preferred) {
        (Tier::Pro | Tier::Premium, Some(provider)) => provider.to_string(),
        _ => get_plan_limits(plan).voice_provider,
    }
}

pub fn plan_info(profile: Option<&Profile>, now: DateTime<Utc>) -> PlanInfo {
    let plan = resolve_effective_plan(profile, now);
    let is_manual = profile.is_some_and(Profile::is_manual);

    PlanInfo {
        plan,
        limits: get_plan_limits(plan),
        is_manual,
        is_trial: is_trial_valid(profile, now) && !is_manual,
        display_name: plan.as_str().to_uppercase(),
    }
}

/// Whole days left in the trial, rounded up. Zero once the trial is not valid.
pub fn trial_days_remaining(profile: Option<&Profile>, now: DateTime<Utc>) -> i64 {
    if !is_trial_valid(profile, now) {
        return 0;
    }

    let Some(ends_at) = profile.and_then(|p| p.trial_ends_at) else {
        return 0;
    };

    let remaining_ms = (ends_at - now).num_milliseconds();
    let days = (remaining_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;

    days.max(0)
}
