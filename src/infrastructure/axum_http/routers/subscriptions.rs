use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    application::usecases::subscriptions::SubscriptionUseCase,
    domain::repositories::{
        plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                plans::PlanPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase = SubscriptionUseCase::new(
        Arc::new(user_repository),
        Arc::new(plan_repository),
        Arc::new(subscription_repository),
    );

    Router::new()
        .route("/plans", get(list_plans))
        .route("/purchase", post(purchase))
        .route("/:user_id/status", get(status))
        .with_state(Arc::new(subscription_usecase))
}

#[derive(Debug, Deserialize)]
pub struct PurchaseModel {
    pub user_id: i64,
    pub plan_id: i64,
}

pub async fn list_plans<U, P, S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, P, S>>>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
    P: PlanRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match subscription_usecase.list_plans().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn purchase<U, P, S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, P, S>>>,
    Json(purchase_model): Json<PurchaseModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
    P: PlanRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match subscription_usecase
        .purchase(purchase_model.user_id, purchase_model.plan_id)
        .await
    {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn status<U, P, S>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<U, P, S>>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
    P: PlanRepository + Send + Sync,
    S: SubscriptionRepository + Send + Sync,
{
    match subscription_usecase.status(user_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
