use crate::domain::quota::UsageSummary;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for GET /api/usage and the consume endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UsageResponse {
    pub period: String,
    #[serde(flatten)]
    pub summary: UsageSummary,
    pub resets_at: DateTime<Utc>,
}

impl UsageResponse {
    pub fn daily(summary: UsageSummary, now: DateTime<Utc>) -> Self {
        Self {
            period: "daily".to_string(),
            summary,
            resets_at: next_daily_reset(now),
        }
    }
}

/// Midnight UTC following `now`.
pub fn next_daily_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive().succ_opt().unwrap_or(now.date_naive());
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}
