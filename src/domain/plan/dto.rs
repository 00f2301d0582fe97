use super::resolver::{
    has_stats_access, plan_info, trial_days_remaining, voice_provider_for, PlanInfo,
};
use crate::domain::profile::Profile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for GET /api/plan
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub info: PlanInfo,
    pub trial_days_remaining: i64,
    pub voice_provider: String,
    pub stats_access: bool,
}

impl PlanResponse {
    pub fn build(profile: Option<&Profile>, now: DateTime<Utc>) -> Self {
        Self {
            info: plan_info(profile, now),
            trial_days_remaining: trial_days_remaining(profile, now),
            voice_provider: voice_provider_for(profile, now),
            stats_access: has_stats_access(profile, now),
        }
    }
}
