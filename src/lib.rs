pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::{
    application::usecases::subscriptions::SubscriptionUseCase,
    infrastructure::postgres::{
        postgres_connection,
        repositories::{
            plans::PlanPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
        },
    },
};

pub async fn run() -> Result<()> {
    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = Arc::new(postgres_connection::establish_connection(
        &dotenvy_env.database.url,
    )?);
    info!("Postgres connection has been established");

    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(&postgres_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&postgres_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&postgres_pool))),
    );
    subscription_usecase.seed_default_plans().await?;

    infrastructure::axum_http::http_serve::start(Arc::new(dotenvy_env), postgres_pool).await?;

    Ok(())
}
