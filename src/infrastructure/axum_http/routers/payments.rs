use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    application::usecases::payments::PaymentUseCase,
    domain::{
        repositories::{payments::PaymentRepository, users::UserRepository},
        value_objects::payments::{CompletionNotice, PaymentDto},
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{payments::PaymentPostgres, users::UserPostgres},
        },
    },
};

const DEFAULT_HISTORY_LIMIT: i64 = 10;

pub fn routes(db_pool: Arc<PgPoolSquad>, supported_currency: String) -> Router {
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(user_repository),
        supported_currency,
    );

    Router::new()
        .route("/", post(create_payment))
        .route("/provider-callback", post(provider_callback))
        .route("/by-payload/:invoice_payload", get(locate_by_payload))
        .route("/user/:user_id", get(payment_history))
        .with_state(Arc::new(payment_usecase))
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentModel {
    pub user_id: i64,
    pub amount: i32,
    pub invoice_payload: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

pub async fn create_payment<P, U>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, U>>>,
    Json(create_payment_model): Json<CreatePaymentModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    match payment_usecase
        .create_payment(
            create_payment_model.user_id,
            create_payment_model.amount,
            create_payment_model.invoice_payload,
        )
        .await
    {
        Ok(payment) => (StatusCode::CREATED, Json(PaymentDto::from(payment))).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn provider_callback<P, U>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, U>>>,
    Json(completion_notice): Json<CompletionNotice>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    match payment_usecase.complete_payment(completion_notice).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

/// Correlation lookup for provider notices that only carry the invoice
/// payload.
pub async fn locate_by_payload<P, U>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, U>>>,
    Path(invoice_payload): Path<String>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    match payment_usecase.locate_by_payload(invoice_payload).await {
        Ok(payment) => (StatusCode::OK, Json(PaymentDto::from(payment))).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn payment_history<P, U>(
    State(payment_usecase): State<Arc<PaymentUseCase<P, U>>>,
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match payment_usecase.history(user_id, limit).await {
        Ok(payments) => {
            let payments: Vec<PaymentDto> = payments.into_iter().map(PaymentDto::from).collect();
            (StatusCode::OK, Json(payments)).into_response()
        }
        Err(err) => error_response(err.status_code(), err),
    }
}
