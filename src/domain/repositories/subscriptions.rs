use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{plans::PlanEntity, subscriptions::SubscriptionEntity},
    value_objects::subscriptions::PurchaseOutcome,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// The whole purchase as one transaction: lock the user row, re-check
    /// the balance, debit and append the ledger row, deactivate prior
    /// subscriptions, insert the new one, move the user's access expiry
    /// to the new end date.
    async fn purchase(&self, user_id: i64, plan: PlanEntity) -> Result<PurchaseOutcome>;

    async fn find_active(&self, user_id: i64) -> Result<Option<SubscriptionEntity>>;
}
