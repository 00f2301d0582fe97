use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{health, plan::PlanController, usage::UsageController};
use crate::infrastructure::auth::{auth_middleware, request_id_middleware, JwtValidator};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

/// Build the application router with all routes configured
pub fn create_app(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    plan_controller: Arc<PlanController>,
    usage_controller: Arc<UsageController>,
) -> Router {
    let validator = Arc::new(JwtValidator::new(
        &config.jwt_secret,
        config.jwt_audience.as_deref(),
    ));

    // Plan route (needs auth)
    let plan_routes = Router::new()
        .route("/api/plan", get(PlanController::get_plan))
        .with_state(plan_controller)
        .layer(middleware::from_fn_with_state(
            validator.clone(),
            auth_middleware,
        ));

    // Usage routes (need auth)
    let usage_routes = Router::new()
        .route("/api/usage", get(UsageController::get_usage))
        .route(
            "/api/usage/generations",
            post(UsageController::consume_generation),
        )
        .route(
            "/api/usage/pro-features",
            post(UsageController::consume_pro_feature),
        )
        .route(
            "/api/usage/dialogs/release",
            post(UsageController::release_saved_dialog),
        )
        .with_state(usage_controller)
        .layer(middleware::from_fn_with_state(validator, auth_middleware));

    let cors = if config.is_development() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(plan_routes)
        .merge(usage_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
