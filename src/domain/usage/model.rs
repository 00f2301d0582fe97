use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted per-user usage counters.
///
/// Reset and carry-over computation happen outside this service; a user
/// without a row is read as `UsageCounters::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageCounters {
    pub daily_generations_used: i32,
    pub daily_pro_features_used: i32,
    pub weekly_generations_used: i32,
    pub weekly_pro_features_used: i32,
    pub carry_over_generations: i32,
    pub carry_over_pro_features: i32,
    pub total_dialogs_count: i32,
}
