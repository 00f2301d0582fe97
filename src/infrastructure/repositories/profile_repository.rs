use crate::domain::plan::Tier;
use crate::domain::profile::{Profile, SubscriptionStatus};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;
use uuid::Uuid;

/// Raw `profiles` row. Billing and trial columns are written by other
/// components and may be NULL.
#[derive(Debug, FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub subscription_tier: Option<String>,
    pub subscription_status: Option<String>,
    pub subscription_cancel_at_period_end: Option<bool>,
    pub subscription_current_period_end: Option<DateTime<Utc>>,
    pub is_trial_active: Option<bool>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub manual_pro: Option<bool>,
    pub manual_premium: Option<bool>,
    pub voice_provider: Option<String>,
}

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Profile {
            id: record.id,
            subscription_tier: record
                .subscription_tier
                .as_deref()
                .map(Tier::from)
                .unwrap_or_default(),
            subscription_status: record
                .subscription_status
                .as_deref()
                .map(SubscriptionStatus::from)
                .unwrap_or_default(),
            subscription_cancel_at_period_end: record
                .subscription_cancel_at_period_end
                .unwrap_or(false),
            subscription_current_period_end: record.subscription_current_period_end,
            is_trial_active: record.is_trial_active.unwrap_or(false),
            trial_ends_at: record.trial_ends_at,
            manual_pro: record.manual_pro.unwrap_or(false),
            manual_premium: record.manual_premium.unwrap_or(false),
            voice_provider: record.voice_provider,
        }
    }
}

pub struct ProfileRepository {
    pool: Arc<DbPool>,
}

impl ProfileRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Find a profile by user ID
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let pool = self.pool.as_ref();
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, subscription_tier, subscription_status,
                   subscription_cancel_at_period_end, subscription_current_period_end,
                   is_trial_active, trial_ends_at, manual_pro, manual_premium, voice_provider
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record.map(Profile::from))
    }
}
