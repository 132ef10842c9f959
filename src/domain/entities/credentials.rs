use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::credentials;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = credentials)]
pub struct CredentialEntity {
    pub id: i64,
    pub user_id: i64,
    pub client_id: Uuid,
    pub path_salt: String,
    pub label: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl CredentialEntity {
    /// The stored flag can lag behind the timestamp in the
    /// stale-but-not-yet-deactivated window; readers must check both.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now <= self.expires_at
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credentials)]
pub struct InsertCredentialEntity {
    pub user_id: i64,
    pub client_id: Uuid,
    pub path_salt: String,
    pub label: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}
