use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    entities::ledger_transactions::LedgerTransactionEntity,
    repositories::ledger::LedgerRepository,
    value_objects::{
        enums::transaction_kinds::TransactionKind,
        ledger::{BalanceSummary, DebitOutcome},
    },
};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("user not found")]
    UserNotFound,
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("insufficient balance, short {shortfall} stars")]
    InsufficientBalance { shortfall: i32 },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            LedgerError::UserNotFound => StatusCode::NOT_FOUND,
            LedgerError::InvalidAmount => StatusCode::BAD_REQUEST,
            LedgerError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

pub struct LedgerUseCase<L>
where
    L: LedgerRepository + Send + Sync + 'static,
{
    ledger_repo: Arc<L>,
}

impl<L> LedgerUseCase<L>
where
    L: LedgerRepository + Send + Sync + 'static,
{
    pub fn new(ledger_repo: Arc<L>) -> Self {
        Self { ledger_repo }
    }

    pub async fn credit(
        &self,
        user_id: i64,
        amount: i32,
        kind: TransactionKind,
        description: String,
    ) -> LedgerResult<i32> {
        if amount <= 0 {
            warn!(%user_id, amount, "ledger: rejected non-positive credit");
            return Err(LedgerError::InvalidAmount);
        }

        let new_balance = self
            .ledger_repo
            .credit(user_id, amount, kind, description)
            .await
            .map_err(|err| {
                error!(%user_id, amount, db_error = ?err, "ledger: credit failed");
                LedgerError::Internal(err)
            })?
            .ok_or(LedgerError::UserNotFound)?;

        info!(%user_id, amount, kind = %kind, new_balance, "ledger: credited");
        Ok(new_balance)
    }

    pub async fn debit(
        &self,
        user_id: i64,
        amount: i32,
        kind: TransactionKind,
        description: String,
    ) -> LedgerResult<i32> {
        if amount <= 0 {
            warn!(%user_id, amount, "ledger: rejected non-positive debit");
            return Err(LedgerError::InvalidAmount);
        }

        let outcome = self
            .ledger_repo
            .debit(user_id, amount, kind, description)
            .await
            .map_err(|err| {
                error!(%user_id, amount, db_error = ?err, "ledger: debit failed");
                LedgerError::Internal(err)
            })?;

        match outcome {
            DebitOutcome::Applied { new_balance } => {
                info!(%user_id, amount, kind = %kind, new_balance, "ledger: debited");
                Ok(new_balance)
            }
            DebitOutcome::InsufficientBalance { balance } => {
                let shortfall = amount - balance;
                warn!(%user_id, amount, balance, shortfall, "ledger: insufficient balance");
                Err(LedgerError::InsufficientBalance { shortfall })
            }
        }
    }

    pub async fn balance(&self, user_id: i64) -> LedgerResult<BalanceSummary> {
        self.ledger_repo
            .balance_summary(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "ledger: failed to load balance");
                LedgerError::Internal(err)
            })?
            .ok_or(LedgerError::UserNotFound)
    }

    pub async fn history(
        &self,
        user_id: i64,
        limit: i64,
    ) -> LedgerResult<Vec<LedgerTransactionEntity>> {
        self.ledger_repo
            .list_transactions(user_id, limit)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "ledger: failed to load history");
                LedgerError::Internal(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::ledger::MockLedgerRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn credit_returns_new_balance() {
        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo
            .expect_credit()
            .with(
                eq(7),
                eq(100),
                eq(TransactionKind::Deposit),
                eq("top-up".to_string()),
            )
            .returning(|_, _, _, _| Box::pin(async { Ok(Some(150)) }));

        let usecase = LedgerUseCase::new(Arc::new(ledger_repo));
        let new_balance = usecase
            .credit(7, 100, TransactionKind::Deposit, "top-up".to_string())
            .await
            .unwrap();

        assert_eq!(new_balance, 150);
    }

    #[tokio::test]
    async fn debit_reports_shortfall_when_balance_is_low() {
        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo.expect_debit().returning(|_, _, _, _| {
            Box::pin(async { Ok(DebitOutcome::InsufficientBalance { balance: 30 }) })
        });

        let usecase = LedgerUseCase::new(Arc::new(ledger_repo));
        let err = usecase
            .debit(7, 100, TransactionKind::Purchase, "plan".to_string())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientBalance { shortfall: 70 }
        ));
    }

    #[tokio::test]
    async fn non_positive_amounts_never_reach_the_repository() {
        let ledger_repo = MockLedgerRepository::new();

        let usecase = LedgerUseCase::new(Arc::new(ledger_repo));
        let err = usecase
            .credit(7, 0, TransactionKind::Deposit, "zero".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidAmount));
    }

    #[tokio::test]
    async fn balance_of_unknown_user_is_not_found() {
        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo
            .expect_balance_summary()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = LedgerUseCase::new(Arc::new(ledger_repo));
        let err = usecase.balance(99).await.unwrap_err();

        assert!(matches!(err, LedgerError::UserNotFound));
    }
}
