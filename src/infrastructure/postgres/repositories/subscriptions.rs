use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::{
            plans::PlanEntity,
            subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        },
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            enums::transaction_kinds::TransactionKind,
            ledger::DebitOutcome,
            subscriptions::{PurchaseOutcome, PurchaseReceipt},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::ledger::debit_within,
        schema::{subscriptions, users},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn purchase(&self, user_id: i64, plan: PlanEntity) -> Result<PurchaseOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction(|conn| {
            // debit_within locks the user row; every later step in this
            // transaction runs under that lock.
            let remaining_balance = match debit_within(
                conn,
                user_id,
                plan.price_stars,
                TransactionKind::Purchase,
                &format!("Subscription purchase: {}", plan.name),
            )? {
                DebitOutcome::Applied { new_balance } => new_balance,
                DebitOutcome::InsufficientBalance { balance } => {
                    return Ok(PurchaseOutcome::InsufficientBalance { balance });
                }
            };

            update(subscriptions::table)
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::is_active.eq(true))
                .set(subscriptions::is_active.eq(false))
                .execute(conn)?;

            let starts_at = Utc::now();
            let ends_at = starts_at + Duration::days(plan.duration_days.into());

            insert_into(subscriptions::table)
                .values(&InsertSubscriptionEntity {
                    user_id,
                    plan_id: plan.id,
                    starts_at,
                    ends_at,
                    is_active: true,
                    stars_paid: plan.price_stars,
                })
                .execute(conn)?;

            update(users::table)
                .filter(users::id.eq(user_id))
                .set(users::access_expires_at.eq(ends_at))
                .execute(conn)?;

            Ok(PurchaseOutcome::Completed(PurchaseReceipt {
                plan_name: plan.name.clone(),
                ends_at,
                duration_days: plan.duration_days,
                stars_paid: plan.price_stars,
                remaining_balance,
            }))
        })
    }

    async fn find_active(&self, user_id: i64) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::is_active.eq(true))
            .filter(subscriptions::ends_at.gt(Utc::now()))
            .order(subscriptions::ends_at.desc())
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }
}
