use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::users::{RegisterUserEntity, TouchUserEntity, UserEntity},
    value_objects::users::{ReferralGrant, RegistrationOutcome},
};

#[async_trait]
#[automock]
pub trait UserRepository {
    /// Inserts the user unless a row with the same external id exists.
    /// The existing row is returned untouched apart from the profile
    /// refresh, so callers can tie create-only side effects to `Created`.
    async fn register_if_absent(
        &self,
        register_user_entity: RegisterUserEntity,
        touch_user_entity: TouchUserEntity,
    ) -> Result<RegistrationOutcome>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserEntity>>;

    async fn find_by_external_id(&self, external_id: i64) -> Result<Option<UserEntity>>;

    /// Extends the referrer's access window and credits the bonus stars
    /// in one transaction.
    async fn grant_referral_bonus(
        &self,
        referral_code: String,
        bonus_days: i64,
        bonus_stars: i32,
    ) -> Result<ReferralGrant>;

    async fn count_referrals(&self, referral_code: String) -> Result<i64>;
}
