use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::ledger_transactions::LedgerTransactionEntity,
    value_objects::{
        enums::transaction_kinds::TransactionKind,
        ledger::{BalanceSummary, DebitOutcome},
    },
};

#[async_trait]
#[automock]
pub trait LedgerRepository {
    /// Adds to the balance and appends one transaction row atomically.
    /// Returns the new balance, or None when the user is unknown.
    async fn credit(
        &self,
        user_id: i64,
        amount: i32,
        kind: TransactionKind,
        description: String,
    ) -> Result<Option<i32>>;

    /// Subtracts from the balance and appends one transaction row
    /// atomically. The balance check runs under the same row lock as the
    /// mutation.
    async fn debit(
        &self,
        user_id: i64,
        amount: i32,
        kind: TransactionKind,
        description: String,
    ) -> Result<DebitOutcome>;

    async fn balance_summary(&self, user_id: i64) -> Result<Option<BalanceSummary>>;

    async fn list_transactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<LedgerTransactionEntity>>;
}
