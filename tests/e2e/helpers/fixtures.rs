use anyhow::Result;
use chrono::{DateTime, Utc};
use dialog_entitlements::domain::usage::UsageCounters;
use sqlx::PgPool;
use uuid::Uuid;

/// Raw profile columns as the billing webhook would write them
#[derive(Debug, Clone, Default)]
pub struct ProfileSeed {
    pub subscription_tier: Option<String>,
    pub subscription_status: Option<String>,
    pub subscription_cancel_at_period_end: bool,
    pub subscription_current_period_end: Option<DateTime<Utc>>,
    pub is_trial_active: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub manual_pro: bool,
    pub manual_premium: bool,
    pub voice_provider: Option<String>,
}

impl ProfileSeed {
    pub fn subscribed(tier: &str, status: &str) -> Self {
        Self {
            subscription_tier: Some(tier.to_string()),
            subscription_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    pub fn trial_ending(trial_ends_at: DateTime<Utc>) -> Self {
        Self {
            is_trial_active: true,
            trial_ends_at: Some(trial_ends_at),
            ..Default::default()
        }
    }

    pub fn manual_premium() -> Self {
        Self {
            manual_premium: true,
            ..Default::default()
        }
    }

    pub fn with_voice_provider(mut self, provider: &str) -> Self {
        self.voice_provider = Some(provider.to_string());
        self
    }
}

pub struct TestFixtures {
    pool: PgPool,
}

impl TestFixtures {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a free profile with every billing column left NULL
    pub async fn create_free_profile(&self) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO profiles (id, subscription_tier) VALUES ($1, NULL)")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn create_profile(&self, seed: ProfileSeed) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, subscription_tier, subscription_status,
                subscription_cancel_at_period_end, subscription_current_period_end,
                is_trial_active, trial_ends_at, manual_pro, manual_premium, voice_provider
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(format!("learner+{}@example.com", id.simple()))
        .bind(&seed.subscription_tier)
        .bind(&seed.subscription_status)
        .bind(seed.subscription_cancel_at_period_end)
        .bind(seed.subscription_current_period_end)
        .bind(seed.is_trial_active)
        .bind(seed.trial_ends_at)
        .bind(seed.manual_pro)
        .bind(seed.manual_premium)
        .bind(&seed.voice_provider)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Overwrite a user's counters, creating the row if needed
    pub async fn set_usage(&self, user_id: Uuid, usage: UsageCounters) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO usage_counters (
                user_id, daily_generations_used, daily_pro_features_used,
                weekly_generations_used, weekly_pro_features_used,
                carry_over_generations, carry_over_pro_features, total_dialogs_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                daily_generations_used = EXCLUDED.daily_generations_used,
                daily_pro_features_used = EXCLUDED.daily_pro_features_used,
                weekly_generations_used = EXCLUDED.weekly_generations_used,
                weekly_pro_features_used = EXCLUDED.weekly_pro_features_used,
                carry_over_generations = EXCLUDED.carry_over_generations,
                carry_over_pro_features = EXCLUDED.carry_over_pro_features,
                total_dialogs_count = EXCLUDED.total_dialogs_count,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(usage.daily_generations_used)
        .bind(usage.daily_pro_features_used)
        .bind(usage.weekly_generations_used)
        .bind(usage.weekly_pro_features_used)
        .bind(usage.carry_over_generations)
        .bind(usage.carry_over_pro_features)
        .bind(usage.total_dialogs_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_usage(&self, user_id: Uuid) -> Result<Option<UsageCounters>> {
        let usage = sqlx::query_as::<_, UsageCounters>(
            r#"
            SELECT daily_generations_used, daily_pro_features_used,
                   weekly_generations_used, weekly_pro_features_used,
                   carry_over_generations, carry_over_pro_features, total_dialogs_count
            FROM usage_counters
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usage)
    }

    pub async fn set_tier(&self, user_id: Uuid, tier: &str, status: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET subscription_tier = $2, subscription_status = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(tier)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
