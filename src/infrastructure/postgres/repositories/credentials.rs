use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::credentials::{CredentialEntity, InsertCredentialEntity},
        repositories::credentials::CredentialRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::credentials},
};

pub struct CredentialPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CredentialPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CredentialRepository for CredentialPostgres {
    async fn find_active(&self, user_id: i64) -> Result<Option<CredentialEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let credential = credentials::table
            .filter(credentials::user_id.eq(user_id))
            .filter(credentials::is_active.eq(true))
            .order(credentials::issued_at.desc())
            .select(CredentialEntity::as_select())
            .first::<CredentialEntity>(&mut conn)
            .optional()?;

        Ok(credential)
    }

    async fn issue(
        &self,
        insert_credential_entity: InsertCredentialEntity,
    ) -> Result<CredentialEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction(|conn| {
            update(credentials::table)
                .filter(credentials::user_id.eq(insert_credential_entity.user_id))
                .filter(credentials::is_active.eq(true))
                .set(credentials::is_active.eq(false))
                .execute(conn)?;

            let credential = insert_into(credentials::table)
                .values(&insert_credential_entity)
                .returning(CredentialEntity::as_returning())
                .get_result::<CredentialEntity>(conn)?;

            Ok(credential)
        })
    }

    async fn deactivate(&self, user_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(credentials::table)
            .filter(credentials::user_id.eq(user_id))
            .filter(credentials::is_active.eq(true))
            .set(credentials::is_active.eq(false))
            .execute(&mut conn)?;

        Ok(())
    }
}
