use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    repositories::{payments::PaymentRepository, users::UserRepository},
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        payments::{CompletionNotice, CompletionResult, PaymentCompletion, PaymentCreation},
    },
};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("user not found")]
    UserNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("duplicate invoice payload")]
    DuplicatePayload,
    #[error("unsupported currency {got}, expected {expected}")]
    InvalidCurrency { expected: String, got: String },
    #[error("amount must be positive")]
    InvalidAmount,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::UserNotFound | PaymentError::PaymentNotFound => StatusCode::NOT_FOUND,
            PaymentError::DuplicatePayload => StatusCode::CONFLICT,
            PaymentError::InvalidCurrency { .. } | PaymentError::InvalidAmount => {
                StatusCode::BAD_REQUEST
            }
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

/// Reconciles external payment-provider notices against internal payment
/// rows. Completion is idempotent: the provider may redeliver the same
/// notice, and only the first delivery credits the ledger.
pub struct PaymentUseCase<P, U>
where
    P: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    user_repo: Arc<U>,
    supported_currency: String,
}

impl<P, U> PaymentUseCase<P, U>
where
    P: PaymentRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(payment_repo: Arc<P>, user_repo: Arc<U>, supported_currency: String) -> Self {
        Self {
            payment_repo,
            user_repo,
            supported_currency,
        }
    }

    pub async fn create_payment(
        &self,
        user_id: i64,
        amount: i32,
        invoice_payload: String,
    ) -> PaymentResult<PaymentEntity> {
        if amount <= 0 {
            warn!(%user_id, amount, "payments: rejected non-positive invoice amount");
            return Err(PaymentError::InvalidAmount);
        }

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load user");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::UserNotFound)?;

        let creation = self
            .payment_repo
            .create(InsertPaymentEntity {
                user_id,
                amount_stars: amount,
                status: PaymentStatus::Pending.to_string(),
                invoice_payload: invoice_payload.clone(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to insert payment");
                PaymentError::Internal(err)
            })?;

        match creation {
            PaymentCreation::Created(payment) => {
                info!(
                    %user_id,
                    payment_id = payment.id,
                    amount,
                    "payments: pending payment created"
                );
                Ok(payment)
            }
            PaymentCreation::DuplicatePayload => {
                warn!(%user_id, invoice_payload, "payments: duplicate invoice payload");
                Err(PaymentError::DuplicatePayload)
            }
        }
    }

    /// Validates the notice before any mutation: a currency mismatch
    /// leaves the payment pending for manual review.
    pub async fn complete_payment(
        &self,
        notice: CompletionNotice,
    ) -> PaymentResult<CompletionResult> {
        if notice.currency != self.supported_currency {
            warn!(
                payment_id = notice.payment_id,
                currency = %notice.currency,
                expected = %self.supported_currency,
                "payments: completion notice in unsupported currency"
            );
            return Err(PaymentError::InvalidCurrency {
                expected: self.supported_currency.clone(),
                got: notice.currency,
            });
        }

        let completion = self
            .payment_repo
            .complete(
                notice.payment_id,
                notice.provider_charge_id,
                notice.external_charge_id,
            )
            .await
            .map_err(|err| {
                error!(
                    payment_id = notice.payment_id,
                    db_error = ?err,
                    "payments: completion transaction failed"
                );
                PaymentError::Internal(err)
            })?;

        match completion {
            PaymentCompletion::Credited { new_balance } => {
                info!(
                    payment_id = notice.payment_id,
                    new_balance, "payments: payment completed and credited"
                );
                Ok(CompletionResult {
                    credited: true,
                    new_balance: Some(new_balance),
                })
            }
            PaymentCompletion::AlreadyCompleted => {
                info!(
                    payment_id = notice.payment_id,
                    "payments: redelivered completion notice, nothing to do"
                );
                Ok(CompletionResult {
                    credited: false,
                    new_balance: None,
                })
            }
            PaymentCompletion::NotFound => {
                warn!(payment_id = notice.payment_id, "payments: unknown payment id");
                Err(PaymentError::PaymentNotFound)
            }
        }
    }

    /// Correlates a provider notice back to the internal payment row.
    pub async fn locate_by_payload(&self, invoice_payload: String) -> PaymentResult<PaymentEntity> {
        self.payment_repo
            .find_by_payload(invoice_payload)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "payments: payload lookup failed");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::PaymentNotFound)
    }

    pub async fn history(&self, user_id: i64, limit: i64) -> PaymentResult<Vec<PaymentEntity>> {
        self.payment_repo
            .list_for_user(user_id, limit)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load history");
                PaymentError::Internal(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::users::UserEntity,
        repositories::{payments::MockPaymentRepository, users::MockUserRepository},
    };
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    const CURRENCY: &str = "XTR";

    fn sample_user(id: i64) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            external_id: 1000 + id,
            username: Some("tester".to_string()),
            first_name: None,
            last_name: None,
            referral_code: "abcd1234".to_string(),
            invited_by: None,
            stars_balance: 0,
            total_earned_stars: 0,
            access_expires_at: now + Duration::hours(24),
            created_at: now,
            last_seen_at: now,
        }
    }

    fn sample_payment(id: i64, user_id: i64, amount: i32) -> PaymentEntity {
        PaymentEntity {
            id,
            user_id,
            amount_stars: amount,
            status: PaymentStatus::Pending.to_string(),
            invoice_payload: format!("stars_{}_{}_abcd1234", amount, user_id),
            provider_charge_id: None,
            external_charge_id: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    fn notice(payment_id: i64, currency: &str) -> CompletionNotice {
        CompletionNotice {
            payment_id,
            provider_charge_id: "prov-1".to_string(),
            external_charge_id: "ext-1".to_string(),
            currency: currency.to_string(),
        }
    }

    fn usecase(
        payment_repo: MockPaymentRepository,
        user_repo: MockUserRepository,
    ) -> PaymentUseCase<MockPaymentRepository, MockUserRepository> {
        PaymentUseCase::new(
            Arc::new(payment_repo),
            Arc::new(user_repo),
            CURRENCY.to_string(),
        )
    }

    #[tokio::test]
    async fn create_payment_inserts_pending_row() {
        let mut payment_repo = MockPaymentRepository::new();
        let mut user_repo = MockUserRepository::new();

        user_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Box::pin(async { Ok(Some(sample_user(7))) }));
        payment_repo.expect_create().returning(|entity| {
            Box::pin(async move {
                Ok(PaymentCreation::Created(PaymentEntity {
                    id: 1,
                    user_id: entity.user_id,
                    amount_stars: entity.amount_stars,
                    status: entity.status,
                    invoice_payload: entity.invoice_payload,
                    provider_charge_id: None,
                    external_charge_id: None,
                    created_at: Utc::now(),
                    completed_at: None,
                }))
            })
        });

        let payment = usecase(payment_repo, user_repo)
            .create_payment(7, 100, "stars_100_1007_abcd1234".to_string())
            .await
            .unwrap();

        assert_eq!(payment.amount_stars, 100);
        assert_eq!(PaymentStatus::from_str(&payment.status), PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_payload_is_rejected_without_second_row() {
        let mut payment_repo = MockPaymentRepository::new();
        let mut user_repo = MockUserRepository::new();

        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_user(7))) }));
        payment_repo
            .expect_create()
            .returning(|_| Box::pin(async { Ok(PaymentCreation::DuplicatePayload) }));

        let err = usecase(payment_repo, user_repo)
            .create_payment(7, 100, "stars_100_1007_abcd1234".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::DuplicatePayload));
    }

    #[tokio::test]
    async fn completion_credits_exactly_once() {
        let mut payment_repo = MockPaymentRepository::new();
        let user_repo = MockUserRepository::new();

        payment_repo
            .expect_complete()
            .times(1)
            .returning(|_, _, _| {
                Box::pin(async { Ok(PaymentCompletion::Credited { new_balance: 100 }) })
            });

        let result = usecase(payment_repo, user_repo)
            .complete_payment(notice(1, CURRENCY))
            .await
            .unwrap();

        assert_eq!(
            result,
            CompletionResult {
                credited: true,
                new_balance: Some(100),
            }
        );
    }

    #[tokio::test]
    async fn redelivered_completion_reports_success_without_credit() {
        let mut payment_repo = MockPaymentRepository::new();
        let user_repo = MockUserRepository::new();

        payment_repo
            .expect_complete()
            .returning(|_, _, _| Box::pin(async { Ok(PaymentCompletion::AlreadyCompleted) }));

        let result = usecase(payment_repo, user_repo)
            .complete_payment(notice(1, CURRENCY))
            .await
            .unwrap();

        assert_eq!(
            result,
            CompletionResult {
                credited: false,
                new_balance: None,
            }
        );
    }

    #[tokio::test]
    async fn currency_mismatch_leaves_payment_untouched() {
        let mut payment_repo = MockPaymentRepository::new();
        let user_repo = MockUserRepository::new();

        // The completion transaction must never run for a foreign
        // currency.
        payment_repo.expect_complete().times(0);

        let err = usecase(payment_repo, user_repo)
            .complete_payment(notice(1, "USD"))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvalidCurrency { .. }));
    }

    #[tokio::test]
    async fn unknown_payment_id_is_not_found() {
        let mut payment_repo = MockPaymentRepository::new();
        let user_repo = MockUserRepository::new();

        payment_repo
            .expect_complete()
            .returning(|_, _, _| Box::pin(async { Ok(PaymentCompletion::NotFound) }));

        let err = usecase(payment_repo, user_repo)
            .complete_payment(notice(404, CURRENCY))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::PaymentNotFound));
    }

    #[tokio::test]
    async fn payload_lookup_resolves_payment() {
        let mut payment_repo = MockPaymentRepository::new();
        let user_repo = MockUserRepository::new();

        payment_repo
            .expect_find_by_payload()
            .with(eq("stars_100_1007_abcd1234".to_string()))
            .returning(|_| Box::pin(async { Ok(Some(sample_payment(1, 7, 100))) }));

        let payment = usecase(payment_repo, user_repo)
            .locate_by_payload("stars_100_1007_abcd1234".to_string())
            .await
            .unwrap();

        assert_eq!(payment.id, 1);
    }
}
