use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::ledger_transactions;

/// Append-only: a user's balance is the running sum of these rows.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = ledger_transactions)]
pub struct LedgerTransactionEntity {
    pub id: i64,
    pub user_id: i64,
    pub amount_stars: i32,
    pub kind: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ledger_transactions)]
pub struct InsertLedgerTransactionEntity {
    pub user_id: i64,
    pub amount_stars: i32,
    pub kind: String,
    pub description: String,
}
