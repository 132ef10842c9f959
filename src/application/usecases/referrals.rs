use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::users::{RegisterUserEntity, TouchUserEntity},
    repositories::users::UserRepository,
    value_objects::users::{
        ReferralGrant, ReferralStats, RegisteredUser, RegistrationModel, RegistrationOutcome,
    },
};

#[derive(Debug, Error)]
pub enum ReferralError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReferralError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReferralError::UserNotFound => StatusCode::NOT_FOUND,
            ReferralError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ReferralResult<T> = std::result::Result<T, ReferralError>;

/// Registers users and propagates the invite bonus. The bonus rides on
/// the create-only branch of registration, which makes re-registration a
/// harmless no-op for the referrer.
pub struct ReferralUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    bonus_days: i64,
    bonus_stars: i32,
    trial_hours: i64,
}

impl<U> ReferralUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, bonus_days: i64, bonus_stars: i32, trial_hours: i64) -> Self {
        Self {
            user_repo,
            bonus_days,
            bonus_stars,
            trial_hours,
        }
    }

    pub async fn register(&self, model: RegistrationModel) -> ReferralResult<RegisteredUser> {
        let outcome = self
            .user_repo
            .register_if_absent(
                RegisterUserEntity {
                    external_id: model.external_id,
                    username: model.username.clone(),
                    first_name: model.first_name.clone(),
                    last_name: model.last_name.clone(),
                    referral_code: fresh_referral_code(),
                    invited_by: model.invited_by,
                    access_expires_at: Utc::now() + Duration::hours(self.trial_hours),
                },
                TouchUserEntity {
                    username: model.username,
                    first_name: model.first_name,
                    last_name: model.last_name,
                    last_seen_at: Utc::now(),
                },
            )
            .await
            .map_err(|err| {
                error!(
                    external_id = model.external_id,
                    db_error = ?err,
                    "referrals: registration failed"
                );
                ReferralError::Internal(err)
            })?;

        match outcome {
            RegistrationOutcome::Created(user) => {
                let referral_granted = match user.invited_by.clone() {
                    Some(code) if code == user.referral_code => {
                        warn!(user_id = user.id, "referrals: self-referral rejected");
                        false
                    }
                    Some(code) => self.grant(&code, user.id).await?,
                    None => false,
                };

                info!(
                    user_id = user.id,
                    external_id = user.external_id,
                    referral_granted,
                    "referrals: new user registered"
                );

                Ok(RegisteredUser {
                    user,
                    created: true,
                    referral_granted,
                })
            }
            RegistrationOutcome::Existing(user) => Ok(RegisteredUser {
                user,
                created: false,
                referral_granted: false,
            }),
        }
    }

    pub async fn stats(&self, user_id: i64) -> ReferralResult<ReferralStats> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "referrals: failed to load user");
                ReferralError::Internal(err)
            })?
            .ok_or(ReferralError::UserNotFound)?;

        let invited_count = self
            .user_repo
            .count_referrals(user.referral_code.clone())
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "referrals: failed to count invites");
                ReferralError::Internal(err)
            })?;

        Ok(ReferralStats {
            referral_code: user.referral_code,
            invited_count,
        })
    }

    async fn grant(&self, referral_code: &str, invitee_id: i64) -> ReferralResult<bool> {
        let grant = self
            .user_repo
            .grant_referral_bonus(referral_code.to_string(), self.bonus_days, self.bonus_stars)
            .await
            .map_err(|err| {
                error!(
                    referral_code,
                    invitee_id,
                    db_error = ?err,
                    "referrals: bonus grant failed"
                );
                ReferralError::Internal(err)
            })?;

        match grant {
            ReferralGrant::Granted {
                new_expiry,
                new_balance,
            } => {
                info!(
                    referral_code,
                    invitee_id,
                    new_expiry = %new_expiry,
                    new_balance,
                    "referrals: bonus granted"
                );
                Ok(true)
            }
            ReferralGrant::ReferrerUnknown => {
                warn!(referral_code, invitee_id, "referrals: unknown referral code");
                Ok(false)
            }
        }
    }
}

fn fresh_referral_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
