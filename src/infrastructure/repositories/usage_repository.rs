use crate::domain::plan::PlanLimits;
use crate::domain::usage::UsageCounters;
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use std::sync::Arc;
use uuid::Uuid;

/// Counter columns with NULLs read as zero.
const COUNTER_COLUMNS: &str = r#"
    COALESCE(daily_generations_used, 0) AS daily_generations_used,
    COALESCE(daily_pro_features_used, 0) AS daily_pro_features_used,
    COALESCE(weekly_generations_used, 0) AS weekly_generations_used,
    COALESCE(weekly_pro_features_used, 0) AS weekly_pro_features_used,
    COALESCE(carry_over_generations, 0) AS carry_over_generations,
    COALESCE(carry_over_pro_features, 0) AS carry_over_pro_features,
    COALESCE(total_dialogs_count, 0) AS total_dialogs_count
"#;

pub struct UsageRepository {
    pool: Arc<DbPool>,
}

impl UsageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Get the counters row for a user, if one exists
    pub async fn get_counters(&self, user_id: Uuid) -> AppResult<Option<UsageCounters>> {
        let pool = self.pool.as_ref();
        let query = format!(
            "SELECT {} FROM usage_counters WHERE user_id = $1",
            COUNTER_COLUMNS
        );

        let counters = sqlx::query_as::<_, UsageCounters>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(counters)
    }

    /// Create an all-zero counters row unless one already exists
    pub async fn ensure_counters(&self, user_id: Uuid) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO usage_counters (user_id, created_at, updated_at)
            VALUES ($1, NOW(), NOW())
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Record one dialog generation if the generation gate still holds.
    ///
    /// The gate predicate and the increment run as a single statement, so
    /// concurrent calls cannot push the counters past the limits. Returns
    /// `None` when the gate failed (or no counters row exists).
    pub async fn try_consume_generation(
        &self,
        user_id: Uuid,
        limits: &PlanLimits,
    ) -> AppResult<Option<UsageCounters>> {
        let pool = self.pool.as_ref();
        let query = format!(
            r#"
            UPDATE usage_counters SET
                daily_generations_used = COALESCE(daily_generations_used, 0) + 1,
                weekly_generations_used = COALESCE(weekly_generations_used, 0) + 1,
                total_dialogs_count = COALESCE(total_dialogs_count, 0) + 1,
                updated_at = NOW()
            WHERE user_id = $1
              AND COALESCE(daily_generations_used, 0)
                  < LEAST($2::bigint + COALESCE(carry_over_generations, 0), $3::bigint)
              AND COALESCE(weekly_generations_used, 0) < $4
              AND COALESCE(total_dialogs_count, 0) < $5
            RETURNING {}
            "#,
            COUNTER_COLUMNS
        );

        let counters = sqlx::query_as::<_, UsageCounters>(&query)
            .bind(user_id)
            .bind(i64::from(limits.generations_base))
            .bind(i64::from(limits.generations_daily_max))
            .bind(limits.generations_weekly_max)
            .bind(limits.max_saved_dialogs)
            .fetch_optional(pool)
            .await?;

        Ok(counters)
    }

    /// Record one pro-feature use if the pro-feature gate still holds.
    ///
    /// With `unmetered` set the limits are skipped and the counters are
    /// incremented unconditionally.
    pub async fn try_consume_pro_feature(
        &self,
        user_id: Uuid,
        limits: &PlanLimits,
        unmetered: bool,
    ) -> AppResult<Option<UsageCounters>> {
        let pool = self.pool.as_ref();
        let query = format!(
            r#"
            UPDATE usage_counters SET
                daily_pro_features_used = COALESCE(daily_pro_features_used, 0) + 1,
                weekly_pro_features_used = COALESCE(weekly_pro_features_used, 0) + 1,
                updated_at = NOW()
            WHERE user_id = $1
              AND (
                $5::boolean
                OR (
                    COALESCE(daily_pro_features_used, 0)
                        < LEAST($2::bigint + COALESCE(carry_over_pro_features, 0), $3::bigint)
                    AND COALESCE(weekly_pro_features_used, 0) < $4
                )
              )
            RETURNING {}
            "#,
            COUNTER_COLUMNS
        );

        let counters = sqlx::query_as::<_, UsageCounters>(&query)
            .bind(user_id)
            .bind(i64::from(limits.pro_features_base))
            .bind(i64::from(limits.pro_features_daily_max))
            .bind(limits.pro_features_weekly_max)
            .bind(unmetered)
            .fetch_optional(pool)
            .await?;

        Ok(counters)
    }

    /// Free one saved-dialog slot after a dialog is deleted. Never goes below zero.
    pub async fn release_saved_dialog(&self, user_id: Uuid) -> AppResult<Option<UsageCounters>> {
        let pool = self.pool.as_ref();
        let query = format!(
            r#"
            UPDATE usage_counters SET
                total_dialogs_count = GREATEST(COALESCE(total_dialogs_count, 0) - 1, 0),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {}
            "#,
            COUNTER_COLUMNS
        );

        let counters = sqlx::query_as::<_, UsageCounters>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(counters)
    }
}
