use serde::{Deserialize, Serialize};

use crate::domain::entities::payments::PaymentEntity;

/// What the reconciler reports back to the delivery layer. A redelivered
/// notice comes back with `credited = false` and no balance change.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionResult {
    pub credited: bool,
    pub new_balance: Option<i32>,
}

/// Outcome of inserting a pending payment keyed by its invoice payload.
#[derive(Debug)]
pub enum PaymentCreation {
    Created(PaymentEntity),
    DuplicatePayload,
}

/// Outcome of the completion step. `AlreadyCompleted` is the idempotent
/// retry branch: the provider may redeliver the same notice.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentCompletion {
    Credited { new_balance: i32 },
    AlreadyCompleted,
    NotFound,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentDto {
    pub id: i64,
    pub amount_stars: i32,
    pub status: String,
    pub invoice_payload: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<PaymentEntity> for PaymentDto {
    fn from(payment: PaymentEntity) -> Self {
        Self {
            id: payment.id,
            amount_stars: payment.amount_stars,
            status: payment.status,
            invoice_payload: payment.invoice_payload,
            created_at: payment.created_at,
            completed_at: payment.completed_at,
        }
    }
}

/// Completion notice as delivered by the payment provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionNotice {
    pub payment_id: i64,
    pub provider_charge_id: String,
    pub external_charge_id: String,
    pub currency: String,
}
