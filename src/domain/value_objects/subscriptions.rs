use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::plans::PlanEntity;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub id: i64,
    pub name: String,
    pub duration_days: i32,
    pub price_stars: i32,
    pub description: Option<String>,
}

impl From<PlanEntity> for PlanDto {
    fn from(plan: PlanEntity) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            duration_days: plan.duration_days,
            price_stars: plan.price_stars,
            description: plan.description,
        }
    }
}

/// Everything the caller needs to render a successful purchase.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PurchaseReceipt {
    pub plan_name: String,
    pub ends_at: DateTime<Utc>,
    pub duration_days: i32,
    pub stars_paid: i32,
    pub remaining_balance: i32,
}

/// Outcome of the atomic purchase transaction. The balance re-check runs
/// under the user row lock, so a concurrent spender surfaces here even
/// after the use case's pre-check passed.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Completed(PurchaseReceipt),
    InsufficientBalance { balance: i32 },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubscriptionStatus {
    pub is_active: bool,
    pub expires_at: DateTime<Utc>,
    pub days_left: i64,
}
