use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        plan::PlanResponse,
        quota::{QuotaService, QuotaServiceApi},
    },
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct PlanController {
    quota_service: Arc<QuotaService>,
}

impl PlanController {
    pub fn new(quota_service: Arc<QuotaService>) -> Self {
        Self { quota_service }
    }

    /// GET /api/plan - Effective plan, limits, trial and voice provider
    pub async fn get_plan(
        State(controller): State<Arc<PlanController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<PlanResponse>> {
        let response = controller.quota_service.plan(auth_user.user_id).await?;
        Ok(Json(response))
    }
}
