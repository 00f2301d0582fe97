use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    domain::{
        quota::{QuotaService, QuotaServiceApi},
        shared::usage_dto::UsageResponse,
    },
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct UsageController {
    quota_service: Arc<QuotaService>,
}

impl UsageController {
    pub fn new(quota_service: Arc<QuotaService>) -> Self {
        Self { quota_service }
    }

    /// GET /api/usage - Counters, remaining quota and gate decisions
    pub async fn get_usage(
        State(controller): State<Arc<UsageController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UsageResponse>> {
        let summary = controller.quota_service.usage_summary(auth_user.user_id).await?;
        Ok(Json(UsageResponse::daily(summary, Utc::now())))
    }

    /// POST /api/usage/generations - Record a dialog generation, 402 when over quota
    pub async fn consume_generation(
        State(controller): State<Arc<UsageController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UsageResponse>> {
        let summary = controller
            .quota_service
            .consume_generation(auth_user.user_id)
            .await?;
        Ok(Json(UsageResponse::daily(summary, Utc::now())))
    }

    /// POST /api/usage/pro-features - Record a pro feature use, 402 when over quota
    pub async fn consume_pro_feature(
        State(controller): State<Arc<UsageController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UsageResponse>> {
        let summary = controller
            .quota_service
            .consume_pro_feature(auth_user.user_id)
            .await?;
        Ok(Json(UsageResponse::daily(summary, Utc::now())))
    }

    /// POST /api/usage/dialogs/release - Free a saved-dialog slot after deletion
    pub async fn release_saved_dialog(
        State(controller): State<Arc<UsageController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<StatusCode> {
        controller
            .quota_service
            .release_saved_dialog(auth_user.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
