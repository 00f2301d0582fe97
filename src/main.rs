use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use dialog_entitlements::controllers::{plan::PlanController, usage::UsageController};
use dialog_entitlements::domain::quota::QuotaService;
use dialog_entitlements::infrastructure::config::{Config, LogFormat};
use dialog_entitlements::infrastructure::db::{check_connection, create_pool, run_migrations};
use dialog_entitlements::infrastructure::http::{create_app, start_http_server};
use dialog_entitlements::infrastructure::repositories::{ProfileRepository, UsageRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    init_logging(&config);

    tracing::info!(
        "Starting dialog entitlements service on {}:{}",
        config.host,
        config.port
    );

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    if config.profile_cache_enabled {
        tracing::info!("Profile cache enabled");
    }

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // Repositories
    let profile_repo = Arc::new(ProfileRepository::new(pool.clone()));
    let usage_repo = Arc::new(UsageRepository::new(pool.clone()));

    // Services
    let quota_service = Arc::new(QuotaService::new(
        profile_repo,
        usage_repo,
        config.profile_cache_enabled,
    ));

    // Controllers
    let plan_controller = Arc::new(PlanController::new(quota_service.clone()));
    let usage_controller = Arc::new(UsageController::new(quota_service));

    let app = create_app(pool, config.clone(), plan_controller, usage_controller);

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dialog_entitlements=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
