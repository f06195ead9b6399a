use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    auth::{AuthConfig, AuthManager},
    config::Config,
};
use pairgoal_core::{
    goals::{GoalService, GoalServiceTrait},
    partners::{PartnerService, PartnerServiceTrait},
    subscriptions::{SubscriptionService, SubscriptionServiceTrait},
    unavailability::{UnavailabilityService, UnavailabilityServiceTrait},
    users::{UserService, UserServiceTrait},
};
use pairgoal_storage_sqlite::{
    db,
    goals::{GoalSettingsRepository, MonthlyGoalRepository},
    partners::PartnerRepository,
    subscriptions::SubscriptionRepository,
    unavailability::UnavailabilityRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub partner_service: Arc<dyn PartnerServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub subscription_service: Arc<dyn SubscriptionServiceTrait>,
    pub unavailability_service: Arc<dyn UnavailabilityServiceTrait>,
    pub auth: Arc<AuthManager>,
    pub upload_dir: PathBuf,
}

pub fn init_tracing() {
    let log_format = std::env::var("PG_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let partner_repository = Arc::new(PartnerRepository::new(pool.clone(), writer.clone()));
    let goal_repository = Arc::new(MonthlyGoalRepository::new(pool.clone(), writer.clone()));
    let settings_repository = Arc::new(GoalSettingsRepository::new(pool.clone(), writer.clone()));
    let subscription_repository =
        Arc::new(SubscriptionRepository::new(pool.clone(), writer.clone()));
    let unavailability_repository = Arc::new(UnavailabilityRepository::new(writer));

    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(user_repository));
    let partner_service = Arc::new(PartnerService::new(
        partner_repository,
        user_service.clone(),
    ));
    let goal_service = Arc::new(GoalService::new(goal_repository, settings_repository));
    let subscription_service = Arc::new(SubscriptionService::new(subscription_repository));
    let unavailability_service = Arc::new(UnavailabilityService::new(
        unavailability_repository,
        user_service.clone(),
    ));

    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        refresh_secret: config.refresh_secret.clone(),
        access_token_ttl: config.access_token_ttl,
        refresh_token_ttl: config.refresh_token_ttl,
    }));

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    Ok(Arc::new(AppState {
        user_service,
        partner_service,
        goal_service,
        subscription_service,
        unavailability_service,
        auth,
        upload_dir: config.upload_dir.clone(),
    }))
}
