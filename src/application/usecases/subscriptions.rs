use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    entities::plans::InsertPlanEntity,
    repositories::{
        plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::subscriptions::{
        PlanDto, PurchaseOutcome, PurchaseReceipt, SubscriptionStatus,
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("user not found")]
    UserNotFound,
    #[error("plan not found")]
    PlanNotFound,
    #[error("insufficient balance, short {shortfall} stars")]
    InsufficientBalance { shortfall: i32 },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::UserNotFound | SubscriptionError::PlanNotFound => {
                StatusCode::NOT_FOUND
            }
            SubscriptionError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type SubscriptionResult<T> = std::result::Result<T, SubscriptionError>;

/// Purchases replace the active subscription; they never stack. The whole
/// purchase commits atomically in the repository, so a failure past the
/// balance check leaves no debited-but-subscription-less user.
pub struct SubscriptionUseCase<U, P, S>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
}

impl<U, P, S> SubscriptionUseCase<U, P, S>
where
    U: UserRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, plan_repo: Arc<P>, subscription_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            plan_repo,
            subscription_repo,
        }
    }

    pub async fn list_plans(&self) -> SubscriptionResult<Vec<PlanDto>> {
        let plans = self.plan_repo.list_active().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to list active plans");
            SubscriptionError::Internal(err)
        })?;

        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn purchase(&self, user_id: i64, plan_id: i64) -> SubscriptionResult<PurchaseReceipt> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%user_id, "subscriptions: purchase for unknown user");
                SubscriptionError::UserNotFound
            })?;

        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .filter(|plan| plan.is_active)
            .ok_or_else(|| {
                warn!(%user_id, plan_id, "subscriptions: purchase of unknown or inactive plan");
                SubscriptionError::PlanNotFound
            })?;

        // Early rejection on the point-in-time balance; the repository
        // re-checks under the row lock before debiting.
        if user.stars_balance < plan.price_stars {
            let shortfall = plan.price_stars - user.stars_balance;
            warn!(
                %user_id,
                plan_id,
                balance = user.stars_balance,
                price = plan.price_stars,
                shortfall,
                "subscriptions: insufficient balance"
            );
            return Err(SubscriptionError::InsufficientBalance { shortfall });
        }

        let price = plan.price_stars;
        let outcome = self
            .subscription_repo
            .purchase(user_id, plan)
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "subscriptions: purchase transaction failed");
                SubscriptionError::Internal(err)
            })?;

        match outcome {
            PurchaseOutcome::Completed(receipt) => {
                info!(
                    %user_id,
                    plan_id,
                    ends_at = %receipt.ends_at,
                    stars_paid = receipt.stars_paid,
                    remaining_balance = receipt.remaining_balance,
                    "subscriptions: purchase completed"
                );
                Ok(receipt)
            }
            PurchaseOutcome::InsufficientBalance { balance } => {
                // A concurrent spender won the row lock first.
                let shortfall = price - balance;
                warn!(
                    %user_id,
                    plan_id,
                    balance,
                    shortfall,
                    "subscriptions: balance consumed concurrently"
                );
                Err(SubscriptionError::InsufficientBalance { shortfall })
            }
        }
    }

    pub async fn status(&self, user_id: i64) -> SubscriptionResult<SubscriptionStatus> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::UserNotFound)?;

        let now = Utc::now();
        let expires_at = user.access_expires_at;

        Ok(SubscriptionStatus {
            is_active: expires_at > now,
            expires_at,
            days_left: (expires_at - now).num_days().max(0),
        })
    }

    /// Idempotent catalog seeding; existing entries are left untouched.
    pub async fn seed_default_plans(&self) -> SubscriptionResult<()> {
        let catalog = vec![
            InsertPlanEntity {
                name: "1 month".to_string(),
                duration_days: 30,
                price_stars: 100,
                description: Some("VPN access for 1 month".to_string()),
                is_active: true,
            },
            InsertPlanEntity {
                name: "3 months".to_string(),
                duration_days: 90,
                price_stars: 250,
                description: Some("VPN access for 3 months".to_string()),
                is_active: true,
            },
            InsertPlanEntity {
                name: "6 months".to_string(),
                duration_days: 180,
                price_stars: 350,
                description: Some("VPN access for 6 months".to_string()),
                is_active: true,
            },
            InsertPlanEntity {
                name: "1 year".to_string(),
                duration_days: 365,
                price_stars: 500,
                description: Some("VPN access for 1 year".to_string()),
                is_active: true,
            },
        ];

        self.plan_repo.seed_missing(catalog).await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to seed plan catalog");
            SubscriptionError::Internal(err)
        })?;

        info!("subscriptions: plan catalog seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{plans::PlanEntity, users::UserEntity},
        repositories::{
            plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
            users::MockUserRepository,
        },
    };
    use chrono::Duration;
    use mockall::predicate::eq;

    fn sample_user(id: i64, balance: i32) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            external_id: 1000 + id,
            username: None,
            first_name: None,
            last_name: None,
            referral_code: "abcd1234".to_string(),
            invited_by: None,
            stars_balance: balance,
            total_earned_stars: balance,
            access_expires_at: now + Duration::hours(24),
            created_at: now,
            last_seen_at: now,
        }
    }

    fn sample_plan(id: i64, duration_days: i32, price_stars: i32) -> PlanEntity {
        PlanEntity {
            id,
            name: format!("{} days", duration_days),
            duration_days,
            price_stars,
            description: None,
            is_active: true,
        }
    }

    fn usecase(
        user_repo: MockUserRepository,
        plan_repo: MockPlanRepository,
        subscription_repo: MockSubscriptionRepository,
    ) -> SubscriptionUseCase<MockUserRepository, MockPlanRepository, MockSubscriptionRepository>
    {
        SubscriptionUseCase::new(
            Arc::new(user_repo),
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
        )
    }

    #[tokio::test]
    async fn purchase_with_empty_balance_reports_full_shortfall() {
        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();

        user_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Box::pin(async { Ok(Some(sample_user(7, 0))) }));
        plan_repo
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(1, 30, 100))) }));
        // Nothing may be mutated on the insufficient-balance path.
        subscription_repo.expect_purchase().times(0);

        let err = usecase(user_repo, plan_repo, subscription_repo)
            .purchase(7, 1)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubscriptionError::InsufficientBalance { shortfall: 100 }
        ));
    }

    #[tokio::test]
    async fn purchase_drains_balance_and_returns_receipt() {
        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();

        let ends_at = Utc::now() + Duration::days(90);
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_user(7, 250))) }));
        plan_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(2, 90, 250))) }));
        subscription_repo.expect_purchase().returning(move |_, plan| {
            Box::pin(async move {
                Ok(PurchaseOutcome::Completed(PurchaseReceipt {
                    plan_name: plan.name,
                    ends_at,
                    duration_days: plan.duration_days,
                    stars_paid: plan.price_stars,
                    remaining_balance: 0,
                }))
            })
        });

        let receipt = usecase(user_repo, plan_repo, subscription_repo)
            .purchase(7, 2)
            .await
            .unwrap();

        assert_eq!(receipt.stars_paid, 250);
        assert_eq!(receipt.remaining_balance, 0);
        assert_eq!(receipt.duration_days, 90);
        assert_eq!(receipt.ends_at, ends_at);
    }

    #[tokio::test]
    async fn concurrent_spender_surfaces_as_insufficient_balance() {
        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();

        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_user(7, 100))) }));
        plan_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_plan(1, 30, 100))) }));
        subscription_repo.expect_purchase().returning(|_, _| {
            Box::pin(async { Ok(PurchaseOutcome::InsufficientBalance { balance: 40 }) })
        });

        let err = usecase(user_repo, plan_repo, subscription_repo)
            .purchase(7, 1)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubscriptionError::InsufficientBalance { shortfall: 60 }
        ));
    }

    #[tokio::test]
    async fn inactive_plan_is_treated_as_missing() {
        let mut user_repo = MockUserRepository::new();
        let mut plan_repo = MockPlanRepository::new();
        let subscription_repo = MockSubscriptionRepository::new();

        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_user(7, 500))) }));
        plan_repo.expect_find_by_id().returning(|_| {
            Box::pin(async {
                let mut plan = sample_plan(3, 30, 100);
                plan.is_active = false;
                Ok(Some(plan))
            })
        });

        let err = usecase(user_repo, plan_repo, subscription_repo)
            .purchase(7, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::PlanNotFound));
    }

    #[tokio::test]
    async fn status_reports_days_left_for_active_access() {
        let mut user_repo = MockUserRepository::new();
        let plan_repo = MockPlanRepository::new();
        let subscription_repo = MockSubscriptionRepository::new();

        user_repo.expect_find_by_id().returning(|_| {
            Box::pin(async {
                let mut user = sample_user(7, 0);
                user.access_expires_at = Utc::now() + Duration::days(30);
                Ok(Some(user))
            })
        });

        let status = usecase(user_repo, plan_repo, subscription_repo)
            .status(7)
            .await
            .unwrap();

        assert!(status.is_active);
        assert_eq!(status.days_left, 29);
    }
}
