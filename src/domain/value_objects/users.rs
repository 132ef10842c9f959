use serde::{Deserialize, Serialize};

use crate::domain::entities::users::UserEntity;

/// Registration request as handed over by the bot/UI glue.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationModel {
    pub external_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invited_by: Option<String>,
}

/// Whether `register_if_absent` created the row or found an existing one.
/// The referral bonus is tied to the `Created` branch only.
#[derive(Debug)]
pub enum RegistrationOutcome {
    Created(UserEntity),
    Existing(UserEntity),
}

/// Registration result handed back to the delivery layer.
#[derive(Debug)]
pub struct RegisteredUser {
    pub user: UserEntity,
    pub created: bool,
    pub referral_granted: bool,
}

/// Outcome of the atomic referrer-bonus grant.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferralGrant {
    Granted {
        new_expiry: chrono::DateTime<chrono::Utc>,
        new_balance: i32,
    },
    ReferrerUnknown,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReferralStats {
    pub referral_code: String,
    pub invited_count: i64,
}
