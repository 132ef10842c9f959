use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use diesel::{Connection, PgConnection, RunQueryDsl, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::ledger_transactions::{InsertLedgerTransactionEntity, LedgerTransactionEntity},
        repositories::ledger::LedgerRepository,
        value_objects::{
            enums::transaction_kinds::TransactionKind,
            ledger::{BalanceSummary, DebitOutcome},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{ledger_transactions, users},
    },
};

pub struct LedgerPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl LedgerPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

/// Credits the balance and appends the matching transaction row. Must run
/// inside an open transaction; takes the user row lock itself. Returns
/// the new balance, or None when the user row does not exist.
pub(crate) fn credit_within(
    conn: &mut PgConnection,
    user_id: i64,
    amount: i32,
    kind: TransactionKind,
    description: &str,
) -> Result<Option<i32>> {
    let balance = users::table
        .filter(users::id.eq(user_id))
        .for_update()
        .select(users::stars_balance)
        .first::<i32>(conn)
        .optional()?;

    let Some(balance) = balance else {
        return Ok(None);
    };

    let new_balance = balance + amount;
    update(users::table)
        .filter(users::id.eq(user_id))
        .set((
            users::stars_balance.eq(new_balance),
            users::total_earned_stars.eq(users::total_earned_stars + amount),
        ))
        .execute(conn)?;

    append_transaction(conn, user_id, amount, kind, description)?;

    Ok(Some(new_balance))
}

/// Debits the balance after re-checking it under the user row lock, and
/// appends the matching transaction row. Must run inside an open
/// transaction.
pub(crate) fn debit_within(
    conn: &mut PgConnection,
    user_id: i64,
    amount: i32,
    kind: TransactionKind,
    description: &str,
) -> Result<DebitOutcome> {
    let balance = users::table
        .filter(users::id.eq(user_id))
        .for_update()
        .select(users::stars_balance)
        .first::<i32>(conn)
        .optional()?
        .ok_or_else(|| anyhow!("user {} missing while debiting", user_id))?;

    if balance < amount {
        return Ok(DebitOutcome::InsufficientBalance { balance });
    }

    let new_balance = balance - amount;
    update(users::table)
        .filter(users::id.eq(user_id))
        .set(users::stars_balance.eq(new_balance))
        .execute(conn)?;

    append_transaction(conn, user_id, -amount, kind, description)?;

    Ok(DebitOutcome::Applied { new_balance })
}

fn append_transaction(
    conn: &mut PgConnection,
    user_id: i64,
    signed_amount: i32,
    kind: TransactionKind,
    description: &str,
) -> Result<()> {
    insert_into(ledger_transactions::table)
        .values(&InsertLedgerTransactionEntity {
            user_id,
            amount_stars: signed_amount,
            kind: kind.to_string(),
            description: description.to_string(),
        })
        .execute(conn)?;

    Ok(())
}

#[async_trait]
impl LedgerRepository for LedgerPostgres {
    async fn credit(
        &self,
        user_id: i64,
        amount: i32,
        kind: TransactionKind,
        description: String,
    ) -> Result<Option<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction(|conn| credit_within(conn, user_id, amount, kind, &description))
    }

    async fn debit(
        &self,
        user_id: i64,
        amount: i32,
        kind: TransactionKind,
        description: String,
    ) -> Result<DebitOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction(|conn| debit_within(conn, user_id, amount, kind, &description))
    }

    async fn balance_summary(&self, user_id: i64) -> Result<Option<BalanceSummary>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = users::table
            .filter(users::id.eq(user_id))
            .select((users::stars_balance, users::total_earned_stars))
            .first::<(i32, i32)>(&mut conn)
            .optional()?;

        Ok(row.map(|(balance, total_earned)| BalanceSummary {
            balance,
            total_earned,
        }))
    }

    async fn list_transactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<LedgerTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = ledger_transactions::table
            .filter(ledger_transactions::user_id.eq(user_id))
            .order(ledger_transactions::created_at.desc())
            .limit(limit)
            .select(LedgerTransactionEntity::as_select())
            .load::<LedgerTransactionEntity>(&mut conn)?;

        Ok(results)
    }
}
