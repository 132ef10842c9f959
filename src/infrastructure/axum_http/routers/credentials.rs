use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    application::usecases::credentials::CredentialUseCase,
    config::config_model::Vpn,
    domain::repositories::{credentials::CredentialRepository, users::UserRepository},
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{credentials::CredentialPostgres, users::UserPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, vpn: &Vpn) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let credential_repository = CredentialPostgres::new(Arc::clone(&db_pool));
    let credential_usecase = CredentialUseCase::new(
        Arc::new(user_repository),
        Arc::new(credential_repository),
        vpn.domain.clone(),
        vpn.ws_path_prefix.clone(),
    );

    Router::new()
        .route("/:user_id", get(connection))
        .route("/:user_id/renew", post(renew))
        .with_state(Arc::new(credential_usecase))
}

pub async fn connection<U, C>(
    State(credential_usecase): State<Arc<CredentialUseCase<U, C>>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
    C: CredentialRepository + Send + Sync,
{
    match credential_usecase.connection(user_id).await {
        Ok(bundle) => (StatusCode::OK, Json(bundle)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn renew<U, C>(
    State(credential_usecase): State<Arc<CredentialUseCase<U, C>>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync,
    C: CredentialRepository + Send + Sync,
{
    match credential_usecase.renew(user_id).await {
        Ok(bundle) => (StatusCode::OK, Json(bundle)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}
