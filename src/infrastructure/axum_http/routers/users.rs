use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usecases::referrals::ReferralUseCase,
    config::config_model::Referral,
    domain::{repositories::users::UserRepository, value_objects::users::RegistrationModel},
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, referral: &Referral) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let referral_usecase = ReferralUseCase::new(
        Arc::new(user_repository),
        referral.bonus_days,
        referral.bonus_stars,
        referral.trial_hours,
    );

    Router::new()
        .route("/register", post(register))
        .route("/:user_id/referrals", get(referral_stats))
        .with_state(Arc::new(referral_usecase))
}

pub async fn register<U>(
    State(referral_usecase): State<Arc<ReferralUseCase<U>>>,
    Json(registration_model): Json<RegistrationModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match referral_usecase.register(registration_model).await {
        Ok(registered) => (
            StatusCode::OK,
            Json(json!({
                "user_id": registered.user.id,
                "referral_code": registered.user.referral_code,
                "access_expires_at": registered.user.access_expires_at,
                "created": registered.created,
                "referral_granted": registered.referral_granted,
            })),
        )
            .into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn referral_stats<U>(
    State(referral_usecase): State<Arc<ReferralUseCase<U>>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
{
    match referral_usecase.stats(user_id).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
