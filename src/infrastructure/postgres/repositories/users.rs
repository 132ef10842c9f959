use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::{
    Connection, RunQueryDsl, insert_into, prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};

use crate::{
    domain::{
        entities::users::{RegisterUserEntity, TouchUserEntity, UserEntity},
        repositories::users::UserRepository,
        value_objects::{
            enums::transaction_kinds::TransactionKind,
            users::{ReferralGrant, RegistrationOutcome},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::ledger::credit_within, schema::users,
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn register_if_absent(
        &self,
        register_user_entity: RegisterUserEntity,
        touch_user_entity: TouchUserEntity,
    ) -> Result<RegistrationOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let external_id = register_user_entity.external_id;

        let existing = users::table
            .filter(users::external_id.eq(external_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        if existing.is_some() {
            let refreshed = update(users::table)
                .filter(users::external_id.eq(external_id))
                .set(&touch_user_entity)
                .returning(UserEntity::as_returning())
                .get_result::<UserEntity>(&mut conn)?;
            return Ok(RegistrationOutcome::Existing(refreshed));
        }

        let inserted = insert_into(users::table)
            .values(&register_user_entity)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn);

        match inserted {
            Ok(user) => Ok(RegistrationOutcome::Created(user)),
            // Lost a registration race; the winner's row is the user.
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                let user = users::table
                    .filter(users::external_id.eq(external_id))
                    .select(UserEntity::as_select())
                    .first::<UserEntity>(&mut conn)?;
                Ok(RegistrationOutcome::Existing(user))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .filter(users::external_id.eq(external_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn grant_referral_bonus(
        &self,
        referral_code: String,
        bonus_days: i64,
        bonus_stars: i32,
    ) -> Result<ReferralGrant> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction(|conn| {
            let referrer = users::table
                .filter(users::referral_code.eq(&referral_code))
                .for_update()
                .select(UserEntity::as_select())
                .first::<UserEntity>(conn)
                .optional()?;

            let Some(referrer) = referrer else {
                return Ok(ReferralGrant::ReferrerUnknown);
            };

            let now = Utc::now();
            let base = if referrer.access_expires_at > now {
                referrer.access_expires_at
            } else {
                now
            };
            let new_expiry = base + Duration::days(bonus_days);

            update(users::table)
                .filter(users::id.eq(referrer.id))
                .set(users::access_expires_at.eq(new_expiry))
                .execute(conn)?;

            let new_balance = credit_within(
                conn,
                referrer.id,
                bonus_stars,
                TransactionKind::Referral,
                "Invite bonus",
            )?
            .ok_or_else(|| anyhow!("referrer {} vanished while granting bonus", referrer.id))?;

            Ok(ReferralGrant::Granted {
                new_expiry,
                new_balance,
            })
        })
    }

    async fn count_referrals(&self, referral_code: String) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = users::table
            .filter(users::invited_by.eq(referral_code))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}
