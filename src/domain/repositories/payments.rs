use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    value_objects::payments::{PaymentCompletion, PaymentCreation},
};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    /// Inserts a pending payment; a payload collision surfaces as
    /// `DuplicatePayload` instead of a second row.
    async fn create(&self, insert_payment_entity: InsertPaymentEntity)
    -> Result<PaymentCreation>;

    async fn find_by_id(&self, payment_id: i64) -> Result<Option<PaymentEntity>>;

    async fn find_by_payload(&self, invoice_payload: String) -> Result<Option<PaymentEntity>>;

    /// Marks the payment completed, stamps the charge ids, and credits
    /// the user's ledger — all in one transaction. A payment already in
    /// the completed state reports `AlreadyCompleted` and changes
    /// nothing.
    async fn complete(
        &self,
        payment_id: i64,
        provider_charge_id: String,
        external_charge_id: String,
    ) -> Result<PaymentCompletion>;

    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<PaymentEntity>>;
}
