use crate::models::{Db, Tenant};
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

#[async_trait]
pub trait TenantOperations {
    async fn create_tenant(&self, name: &str) -> Result<Tenant>;
    async fn fetch_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>>;
    async fn fetch_active_tenant_by_id(&self, id: Uuid) -> Result<Option<Tenant>>;
}

#[async_trait]
impl TenantOperations for Db {
    async fn create_tenant(&self, name: &str) -> Result<Tenant> {
        let rec = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        info!(tenant_id=%rec.id, name=%rec.name, "tenant created");
        Ok(rec)
    }

    async fn fetch_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>> {
        let rec = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE name = $1 AND deleted_at IS NULL",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn fetch_active_tenant_by_id(&self, id: Uuid) -> Result<Option<Tenant>> {
        let rec = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE id = $1 AND is_active AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }
}
