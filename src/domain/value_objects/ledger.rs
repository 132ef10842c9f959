use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ledger_transactions::LedgerTransactionEntity;

/// Result of an atomic debit attempt. Insufficient funds is a business
/// outcome, not a storage fault, so it travels as data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebitOutcome {
    Applied { new_balance: i32 },
    InsufficientBalance { balance: i32 },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BalanceSummary {
    pub balance: i32,
    pub total_earned: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerTransactionDto {
    pub amount_stars: i32,
    pub kind: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerTransactionEntity> for LedgerTransactionDto {
    fn from(transaction: LedgerTransactionEntity) -> Self {
        Self {
            amount_stars: transaction.amount_stars,
            kind: transaction.kind,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}
