use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity};

#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn list_active(&self) -> Result<Vec<PlanEntity>>;

    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;

    /// Seeds catalog entries that are not present yet, keyed by name.
    async fn seed_missing(&self, plans: Vec<InsertPlanEntity>) -> Result<()>;
}
