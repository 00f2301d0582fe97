use super::error::QuotaServiceError;
use super::gate::{check_generation_against, check_pro_features_against, QuotaDenial};
use super::summary::{usage_summary, UsageSummary};
use crate::domain::plan::{get_plan_limits, resolve_effective_plan, PlanResponse};
use crate::domain::profile::Profile;
use crate::domain::usage::UsageCounters;
use crate::infrastructure::repositories::{ProfileRepository, UsageRepository};
use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// How long a cached profile may be served before it is re-read.
const PROFILE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Conditional updates tried per consume before giving up.
const CONSUME_ATTEMPTS: usize = 2;

pub struct QuotaService {
    profile_repo: Arc<ProfileRepository>,
    usage_repo: Arc<UsageRepository>,
    profile_cache: Option<Cache<Uuid, Profile>>,
}

impl QuotaService {
    pub fn new(
        profile_repo: Arc<ProfileRepository>,
        usage_repo: Arc<UsageRepository>,
        profile_cache_enabled: bool,
    ) -> Self {
        let profile_cache = if profile_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(10_000)
                    .time_to_live(PROFILE_CACHE_TTL)
                    .build(),
            )
        } else {
            None
        };

        Self {
            profile_repo,
            usage_repo,
            profile_cache,
        }
    }
}

#[async_trait]
pub trait QuotaServiceApi: Send + Sync {
    /// Effective plan, limits and plan-level accessors for a user
    async fn plan(&self, user_id: Uuid) -> Result<PlanResponse, QuotaServiceError>;

    /// Usage counters, remaining quota and gate decisions for a user
    async fn usage_summary(&self, user_id: Uuid) -> Result<UsageSummary, QuotaServiceError>;

    /// Record one dialog generation
    ///
    /// This operation:
    /// - Reads the profile from the database, bypassing the cache
    /// - Creates the counters row if the user has none yet
    /// - Increments daily, weekly and saved-dialog counters in one
    ///   conditional update, only if the generation gate holds
    /// - Returns the denial reason when it does not
    async fn consume_generation(&self, user_id: Uuid) -> Result<UsageSummary, QuotaServiceError>;

    /// Record one pro-feature use (same contract as `consume_generation`)
    async fn consume_pro_feature(&self, user_id: Uuid) -> Result<UsageSummary, QuotaServiceError>;

    /// Give back a saved-dialog slot after a dialog was deleted
    async fn release_saved_dialog(&self, user_id: Uuid) -> Result<(), QuotaServiceError>;
}

#[async_trait]
impl QuotaServiceApi for QuotaService {
    async fn plan(&self, user_id: Uuid) -> Result<PlanResponse, QuotaServiceError> {
        let profile = self.cached_profile(user_id).await?;
        Ok(PlanResponse::build(profile.as_ref(), Utc::now()))
    }

    async fn usage_summary(&self, user_id: Uuid) -> Result<UsageSummary, QuotaServiceError> {
        let profile = self.cached_profile(user_id).await?;
        let usage = self.find_counters(user_id).await?;

        Ok(usage_summary(usage.as_ref(), profile.as_ref(), Utc::now()))
    }

    async fn consume_generation(&self, user_id: Uuid) -> Result<UsageSummary, QuotaServiceError> {
        let profile = self.fresh_profile(user_id).await?;
        let tier = resolve_effective_plan(profile.as_ref(), Utc::now());
        let limits = get_plan_limits(tier);
        let limits = &limits;

        self.usage_repo.ensure_counters(user_id).await?;

        let outcome = consume_with_retry(
            move || async move {
                self.usage_repo
                    .try_consume_generation(user_id, limits)
                    .await
                    .map_err(QuotaServiceError::from)
            },
            move || self.find_counters(user_id),
            move |usage| check_generation_against(usage, limits),
        )
        .await;

        match outcome {
            Ok(counters) => {
                tracing::info!(
                    user_id = %user_id,
                    plan = %tier,
                    daily_generations_used = counters.daily_generations_used,
                    weekly_generations_used = counters.weekly_generations_used,
                    total_dialogs_count = counters.total_dialogs_count,
                    "Generation recorded"
                );
                Ok(usage_summary(Some(&counters), profile.as_ref(), Utc::now()))
            }
            Err(QuotaServiceError::QuotaDenied(denial)) => {
                tracing::info!(
                    user_id = %user_id,
                    plan = %tier,
                    denied_by = %denial,
                    "Generation denied"
                );
                Err(QuotaServiceError::QuotaDenied(denial))
            }
            Err(e) => Err(e),
        }
    }

    async fn consume_pro_feature(&self, user_id: Uuid) -> Result<UsageSummary, QuotaServiceError> {
        let profile = self.fresh_profile(user_id).await?;
        let tier = resolve_effective_plan(profile.as_ref(), Utc::now());
        let limits = get_plan_limits(tier);
        let limits = &limits;
        let unmetered = tier.is_unmetered();

        self.usage_repo.ensure_counters(user_id).await?;

        let outcome = consume_with_retry(
            move || async move {
                self.usage_repo
                    .try_consume_pro_feature(user_id, limits, unmetered)
                    .await
                    .map_err(QuotaServiceError::from)
            },
            move || self.find_counters(user_id),
            move |usage| check_pro_features_against(usage, tier, limits),
        )
        .await;

        match outcome {
            Ok(counters) => {
                tracing::info!(
                    user_id = %user_id,
                    plan = %tier,
                    daily_pro_features_used = counters.daily_pro_features_used,
                    weekly_pro_features_used = counters.weekly_pro_features_used,
                    "Pro feature use recorded"
                );
                Ok(usage_summary(Some(&counters), profile.as_ref(), Utc::now()))
            }
            Err(QuotaServiceError::QuotaDenied(denial)) => {
                tracing::info!(
                    user_id = %user_id,
                    plan = %tier,
                    denied_by = %denial,
                    "Pro feature denied"
                );
                Err(QuotaServiceError::QuotaDenied(denial))
            }
            Err(e) => Err(e),
        }
    }

    async fn release_saved_dialog(&self, user_id: Uuid) -> Result<(), QuotaServiceError> {
        match self.usage_repo.release_saved_dialog(user_id).await? {
            Some(counters) => tracing::info!(
                user_id = %user_id,
                total_dialogs_count = counters.total_dialogs_count,
                "Saved dialog released"
            ),
            None => tracing::debug!(user_id = %user_id, "No counters row, nothing to release"),
        }

        Ok(())
    }
}

impl QuotaService {
    /// Profile for read-only views; may be up to `PROFILE_CACHE_TTL` stale.
    async fn cached_profile(&self, user_id: Uuid) -> Result<Option<Profile>, QuotaServiceError> {
        if let Some(cache) = &self.profile_cache {
            if let Some(profile) = cache.get(&user_id).await {
                tracing::debug!(user_id = %user_id, "Profile served from cache");
                return Ok(Some(profile));
            }
        }

        self.fresh_profile(user_id).await
    }

    /// Profile straight from the database. Refreshes the cache entry.
    ///
    /// Missing profiles are not an error: the resolver treats them as free.
    async fn fresh_profile(&self, user_id: Uuid) -> Result<Option<Profile>, QuotaServiceError> {
        let profile = self.profile_repo.find_by_id(user_id).await?;

        match (&self.profile_cache, &profile) {
            (Some(cache), Some(found)) => cache.insert(user_id, found.clone()).await,
            (Some(cache), None) => cache.invalidate(&user_id).await,
            (None, _) => {}
        }
        if profile.is_none() {
            tracing::debug!(user_id = %user_id, "No profile found, resolving as free");
        }

        Ok(profile)
    }

    async fn find_counters(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UsageCounters>, QuotaServiceError> {
        Ok(self.usage_repo.get_counters(user_id).await?)
    }
}

/// Run a conditional update, naming the limit when it is rejected.
///
/// A rejection is followed by a re-read of the counters. If the re-read
/// fails the gate, that denial is returned. If it passes (a release or the
/// daily reset landed in between), the update is tried again, up to
/// `CONSUME_ATTEMPTS` times.
async fn consume_with_retry<A, AFut, R, RFut, C>(
    mut attempt: A,
    mut reread: R,
    check: C,
) -> Result<UsageCounters, QuotaServiceError>
where
    A: FnMut() -> AFut,
    AFut: Future<Output = Result<Option<UsageCounters>, QuotaServiceError>>,
    R: FnMut() -> RFut,
    RFut: Future<Output = Result<Option<UsageCounters>, QuotaServiceError>>,
    C: Fn(&UsageCounters) -> Result<(), QuotaDenial>,
{
    for attempt_no in 1..=CONSUME_ATTEMPTS {
        if let Some(counters) = attempt().await? {
            return Ok(counters);
        }

        let usage = reread().await?.unwrap_or_default();
        check(&usage).map_err(QuotaServiceError::QuotaDenied)?;

        tracing::debug!(
            attempt = attempt_no,
            "Conditional update rejected but counters are within limits"
        );
    }

    Err(QuotaServiceError::Other(anyhow::anyhow!(
        "quota update rejected {} times while counters were within limits; retry the request",
        CONSUME_ATTEMPTS
    )))
}
