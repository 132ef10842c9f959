use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        credentials::{CredentialEntity, InsertCredentialEntity},
        users::UserEntity,
    },
    repositories::{credentials::CredentialRepository, users::UserRepository},
    value_objects::{
        credentials::ConnectionBundle,
        enums::masking_profiles::MaskingProfile,
        vless::{ConnectionLink, build_connection_uri, derive_ws_path, link_label},
    },
};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("user not found")]
    UserNotFound,
    #[error("access expired")]
    AccessExpired,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CredentialError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CredentialError::UserNotFound => StatusCode::NOT_FOUND,
            CredentialError::AccessExpired => StatusCode::FORBIDDEN,
            CredentialError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Issues and renews tunnel credentials. A credential's lifetime mirrors
/// the user's access window (paid subscription end or trial end); at most
/// one credential per user is live at a time.
pub struct CredentialUseCase<U, C>
where
    U: UserRepository + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    domain: String,
    ws_path_prefix: String,
}

impl<U, C> CredentialUseCase<U, C>
where
    U: UserRepository + Send + Sync + 'static,
    C: CredentialRepository + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        credential_repo: Arc<C>,
        domain: String,
        ws_path_prefix: String,
    ) -> Self {
        Self {
            user_repo,
            credential_repo,
            domain,
            ws_path_prefix,
        }
    }

    /// Issues on first call, reuses while the stored credential is valid
    /// and still aligned with the user's access window, re-issues
    /// otherwise.
    pub async fn connection(&self, user_id: i64) -> CredentialResult<ConnectionBundle> {
        let user = self.load_user_with_access(user_id).await?;

        let current = self
            .credential_repo
            .find_active(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "credentials: failed to load credential");
                CredentialError::Internal(err)
            })?;

        let now = Utc::now();
        if let Some(credential) = current {
            // Both the flag and the timestamp must agree, and a purchase
            // since the last issue moves the access window, which forces
            // a re-issue here.
            if credential.is_valid_at(now) && credential.expires_at == user.access_expires_at {
                return Ok(self.bundle(&user, &credential));
            }

            info!(
                %user_id,
                credential_expires = %credential.expires_at,
                access_expires = %user.access_expires_at,
                "credentials: stored credential stale, re-issuing"
            );
        }

        let credential = self.issue(&user).await?;
        Ok(self.bundle(&user, &credential))
    }

    /// User-triggered rotation: the old credential dies with the renewal,
    /// the new one inherits the current access window.
    pub async fn renew(&self, user_id: i64) -> CredentialResult<ConnectionBundle> {
        let user = self.load_user_with_access(user_id).await?;

        let credential = self.issue(&user).await?;
        info!(%user_id, client_id = %credential.client_id, "credentials: renewed");

        Ok(self.bundle(&user, &credential))
    }

    async fn load_user_with_access(&self, user_id: i64) -> CredentialResult<UserEntity> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "credentials: failed to load user");
                CredentialError::Internal(err)
            })?
            .ok_or(CredentialError::UserNotFound)?;

        if user.access_expires_at <= Utc::now() {
            warn!(
                %user_id,
                access_expires = %user.access_expires_at,
                "credentials: no remaining access time"
            );
            return Err(CredentialError::AccessExpired);
        }

        Ok(user)
    }

    async fn issue(&self, user: &UserEntity) -> CredentialResult<CredentialEntity> {
        let credential = self
            .credential_repo
            .issue(InsertCredentialEntity {
                user_id: user.id,
                client_id: Uuid::new_v4(),
                path_salt: fresh_path_salt(),
                label: format!("user{}@{}", user.external_id, self.domain),
                expires_at: user.access_expires_at,
                is_active: true,
            })
            .await
            .map_err(|err| {
                error!(user_id = user.id, db_error = ?err, "credentials: issue failed");
                CredentialError::Internal(err)
            })?;

        info!(
            user_id = user.id,
            client_id = %credential.client_id,
            expires_at = %credential.expires_at,
            "credentials: issued"
        );

        Ok(credential)
    }

    fn bundle(&self, user: &UserEntity, credential: &CredentialEntity) -> ConnectionBundle {
        let links = MaskingProfile::ALL
            .into_iter()
            .map(|profile| {
                let ws_path = derive_ws_path(
                    &self.ws_path_prefix,
                    user.id,
                    &credential.path_salt,
                    profile,
                );
                let label = link_label(&credential.label, profile);
                let uri = build_connection_uri(
                    &credential.client_id,
                    &self.domain,
                    &ws_path,
                    &label,
                    profile,
                );
                ConnectionLink {
                    profile,
                    ws_path,
                    uri,
                }
            })
            .collect();

        ConnectionBundle {
            client_id: credential.client_id,
            expires_at: credential.expires_at,
            links,
        }
    }
}

fn fresh_path_salt() -> String {
    format!("{:016x}", rand::random::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        credentials::MockCredentialRepository, users::MockUserRepository,
    };
    use chrono::Duration;

    const DOMAIN: &str = "vpn.example.com";

    fn sample_user(id: i64, expires_in_hours: i64) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            external_id: 1000 + id,
            username: None,
            first_name: None,
            last_name: None,
            referral_code: "abcd1234".to_string(),
            invited_by: None,
            stars_balance: 0,
            total_earned_stars: 0,
            access_expires_at: now + Duration::hours(expires_in_hours),
            created_at: now,
            last_seen_at: now,
        }
    }

    fn sample_credential(user: &UserEntity) -> CredentialEntity {
        CredentialEntity {
            id: 1,
            user_id: user.id,
            client_id: Uuid::new_v4(),
            path_salt: "00ff00ff00ff00ff".to_string(),
            label: format!("user{}@{}", user.external_id, DOMAIN),
            issued_at: Utc::now(),
            expires_at: user.access_expires_at,
            is_active: true,
        }
    }

    fn usecase(
        user_repo: MockUserRepository,
        credential_repo: MockCredentialRepository,
    ) -> CredentialUseCase<MockUserRepository, MockCredentialRepository> {
        CredentialUseCase::new(
            Arc::new(user_repo),
            Arc::new(credential_repo),
            DOMAIN.to_string(),
            "/vless/".to_string(),
        )
    }

    #[tokio::test]
    async fn first_call_issues_a_credential() {
        let mut user_repo = MockUserRepository::new();
        let mut credential_repo = MockCredentialRepository::new();

        let user = sample_user(7, 24);
        let issued = sample_credential(&user);

        user_repo.expect_find_by_id().returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        credential_repo
            .expect_find_active()
            .returning(|_| Box::pin(async { Ok(None) }));
        credential_repo
            .expect_issue()
            .times(1)
            .returning(move |entity| {
                let mut credential = issued.clone();
                credential.client_id = entity.client_id;
                credential.path_salt = entity.path_salt;
                Box::pin(async move { Ok(credential) })
            });

        let bundle = usecase(user_repo, credential_repo).connection(7).await.unwrap();

        assert_eq!(bundle.links.len(), MaskingProfile::ALL.len());
        assert!(bundle.links[0].uri.starts_with("vless://"));
    }

    #[tokio::test]
    async fn valid_credential_is_reused() {
        let mut user_repo = MockUserRepository::new();
        let mut credential_repo = MockCredentialRepository::new();

        let user = sample_user(7, 24);
        let existing = sample_credential(&user);
        let client_id = existing.client_id;

        user_repo.expect_find_by_id().returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        credential_repo.expect_find_active().returning(move |_| {
            let existing = existing.clone();
            Box::pin(async move { Ok(Some(existing)) })
        });
        credential_repo.expect_issue().times(0);

        let bundle = usecase(user_repo, credential_repo).connection(7).await.unwrap();

        assert_eq!(bundle.client_id, client_id);
    }

    #[tokio::test]
    async fn credential_behind_the_access_window_is_reissued() {
        let mut user_repo = MockUserRepository::new();
        let mut credential_repo = MockCredentialRepository::new();

        // Purchase moved the access window after the last issue.
        let user = sample_user(7, 24 * 30);
        let new_window = user.access_expires_at;
        let mut stale = sample_credential(&user);
        stale.expires_at = Utc::now() + Duration::hours(1);
        let reissued = sample_credential(&user);

        user_repo.expect_find_by_id().returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        credential_repo.expect_find_active().returning(move |_| {
            let stale = stale.clone();
            Box::pin(async move { Ok(Some(stale)) })
        });
        credential_repo.expect_issue().times(1).returning(move |_| {
            let reissued = reissued.clone();
            Box::pin(async move { Ok(reissued) })
        });

        let bundle = usecase(user_repo, credential_repo).connection(7).await.unwrap();

        assert_eq!(bundle.expires_at, new_window);
    }

    #[tokio::test]
    async fn expired_access_yields_no_credential() {
        let mut user_repo = MockUserRepository::new();
        let mut credential_repo = MockCredentialRepository::new();

        let user = sample_user(7, -1);
        user_repo.expect_find_by_id().returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        credential_repo.expect_find_active().times(0);
        credential_repo.expect_issue().times(0);

        let err = usecase(user_repo, credential_repo)
            .connection(7)
            .await
            .unwrap_err();

        assert!(matches!(err, CredentialError::AccessExpired));
    }

    #[tokio::test]
    async fn renew_always_rotates() {
        let mut user_repo = MockUserRepository::new();
        let mut credential_repo = MockCredentialRepository::new();

        let user = sample_user(7, 24);
        let reissued = sample_credential(&user);

        user_repo.expect_find_by_id().returning(move |_| {
            let user = user.clone();
            Box::pin(async move { Ok(Some(user)) })
        });
        credential_repo.expect_issue().times(1).returning(move |_| {
            let reissued = reissued.clone();
            Box::pin(async move { Ok(reissued) })
        });

        let bundle = usecase(user_repo, credential_repo).renew(7).await.unwrap();

        assert_eq!(bundle.links.len(), 4);
    }

    #[test]
    fn stale_flag_does_not_outlive_the_timestamp() {
        let user = sample_user(7, 24);
        let mut credential = sample_credential(&user);
        credential.is_active = true;
        credential.expires_at = Utc::now() - Duration::seconds(1);

        assert!(!credential.is_valid_at(Utc::now()));
    }
}
