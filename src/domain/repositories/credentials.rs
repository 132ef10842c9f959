use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::credentials::{CredentialEntity, InsertCredentialEntity};

#[async_trait]
#[automock]
pub trait CredentialRepository {
    async fn find_active(&self, user_id: i64) -> Result<Option<CredentialEntity>>;

    /// Deactivates any prior active credential and inserts the new one in
    /// the same transaction, so at most one credential per user is live.
    async fn issue(
        &self,
        insert_credential_entity: InsertCredentialEntity,
    ) -> Result<CredentialEntity>;

    async fn deactivate(&self, user_id: i64) -> Result<()>;
}
