use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    Connection, RunQueryDsl, insert_into, prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};

use crate::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::payments::PaymentRepository,
        value_objects::{
            enums::{payment_statuses::PaymentStatus, transaction_kinds::TransactionKind},
            payments::{PaymentCompletion, PaymentCreation},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::ledger::credit_within, schema::payments,
    },
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(
        &self,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<PaymentCreation> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(payments::table)
            .values(&insert_payment_entity)
            .returning(PaymentEntity::as_returning())
            .get_result::<PaymentEntity>(&mut conn);

        match result {
            Ok(payment) => Ok(PaymentCreation::Created(payment)),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Ok(PaymentCreation::DuplicatePayload)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, payment_id: i64) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .find(payment_id)
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn find_by_payload(&self, invoice_payload: String) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .filter(payments::invoice_payload.eq(invoice_payload))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn complete(
        &self,
        payment_id: i64,
        provider_charge_id: String,
        external_charge_id: String,
    ) -> Result<PaymentCompletion> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction(|conn| {
            let payment = payments::table
                .find(payment_id)
                .for_update()
                .select(PaymentEntity::as_select())
                .first::<PaymentEntity>(conn)
                .optional()?;

            let Some(payment) = payment else {
                return Ok(PaymentCompletion::NotFound);
            };

            if PaymentStatus::from_str(&payment.status) == PaymentStatus::Completed {
                return Ok(PaymentCompletion::AlreadyCompleted);
            }

            update(payments::table)
                .filter(payments::id.eq(payment_id))
                .set((
                    payments::status.eq(PaymentStatus::Completed.to_string()),
                    payments::provider_charge_id.eq(Some(provider_charge_id.clone())),
                    payments::external_charge_id.eq(Some(external_charge_id.clone())),
                    payments::completed_at.eq(Some(Utc::now())),
                ))
                .execute(conn)?;

            let new_balance = credit_within(
                conn,
                payment.user_id,
                payment.amount_stars,
                TransactionKind::Deposit,
                "Balance top-up via payment provider",
            )?
            .ok_or_else(|| anyhow!("user {} missing while crediting payment", payment.user_id))?;

            Ok(PaymentCompletion::Credited { new_balance })
        })
    }

    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::user_id.eq(user_id))
            .order(payments::created_at.desc())
            .limit(limit)
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }
}
