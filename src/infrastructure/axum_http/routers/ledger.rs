use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::usecases::ledger::LedgerUseCase,
    domain::{
        repositories::ledger::LedgerRepository, value_objects::ledger::LedgerTransactionDto,
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        postgres::{postgres_connection::PgPoolSquad, repositories::ledger::LedgerPostgres},
    },
};

const DEFAULT_HISTORY_LIMIT: i64 = 10;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let ledger_repository = LedgerPostgres::new(Arc::clone(&db_pool));
    let ledger_usecase = LedgerUseCase::new(Arc::new(ledger_repository));

    Router::new()
        .route("/:user_id/balance", get(balance))
        .route("/:user_id/transactions", get(transactions))
        .with_state(Arc::new(ledger_usecase))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

pub async fn balance<L>(
    State(ledger_usecase): State<Arc<LedgerUseCase<L>>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse
where
    L: LedgerRepository + Send + Sync,
{
    match ledger_usecase.balance(user_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err.status_code(), err),
    }
}

pub async fn transactions<L>(
    State(ledger_usecase): State<Arc<LedgerUseCase<L>>>,
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse
where
    L: LedgerRepository + Send + Sync,
{
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match ledger_usecase.history(user_id, limit).await {
        Ok(transactions) => {
            let transactions: Vec<LedgerTransactionDto> =
                transactions.into_iter().map(LedgerTransactionDto::from).collect();
            (StatusCode::OK, Json(transactions)).into_response()
        }
        Err(err) => error_response(err.status_code(), err),
    }
}
