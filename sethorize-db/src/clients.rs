use crate::models::{Client, Db, NewClient};
use anyhow::Result;
use async_trait::async_trait;
use sethorize_crypto::Argon2Hasher;
use tracing::{debug, info};
use uuid::Uuid;

#[async_trait]
pub trait ClientOperations {
    async fn create_client(&self, nc: NewClient) -> Result<Client>;
    async fn fetch_client_by_id(&self, id: Uuid) -> Result<Option<Client>>;
    async fn fetch_client_by_slug(&self, slug: &str) -> Result<Option<Client>>;
    async fn fetch_active_client_by_id(&self, id: Uuid) -> Result<Option<Client>>;
    async fn fetch_client_by_slug_in_tenant(
        &self,
        slug: &str,
        tenant_id: Uuid,
    ) -> Result<Option<Client>>;
    async fn soft_delete_client(&self, id: Uuid) -> Result<bool>;
    /// Include-deleted lookup; everything else filters soft-deleted rows.
    async fn fetch_client_any_state(&self, id: Uuid) -> Result<Option<Client>>;
}

#[async_trait]
impl ClientOperations for Db {
    async fn create_client(&self, nc: NewClient) -> Result<Client> {
        debug!(slug=%nc.slug, tenant_id=%nc.tenant_id, "creating new client");
        // Pre-insert hook: the shared secret is hashed before the row exists.
        let secret_hash = Argon2Hasher::default().hash(&nc.secret)?;
        let rec = sqlx::query_as::<_, Client>(
            "INSERT INTO clients (name, slug, description, secret_hash, redirect_uris, scopes, is_internal, tenant_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&nc.name)
        .bind(&nc.slug)
        .bind(&nc.description)
        .bind(&secret_hash)
        .bind(&nc.redirect_uris)
        .bind(&nc.scopes)
        .bind(nc.is_internal)
        .bind(nc.tenant_id)
        .fetch_one(&self.pool)
        .await?;
        info!(client_id=%rec.id, slug=%rec.slug, "client created");
        Ok(rec)
    }

    async fn fetch_client_by_id(&self, id: Uuid) -> Result<Option<Client>> {
        let rec = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn fetch_client_by_slug(&self, slug: &str) -> Result<Option<Client>> {
        let rec = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE slug = $1 AND deleted_at IS NULL",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn fetch_active_client_by_id(&self, id: Uuid) -> Result<Option<Client>> {
        let rec = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND is_active AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn fetch_client_by_slug_in_tenant(
        &self,
        slug: &str,
        tenant_id: Uuid,
    ) -> Result<Option<Client>> {
        let rec = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE slug = $1 AND tenant_id = $2 AND deleted_at IS NULL",
        )
        .bind(slug)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn soft_delete_client(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE clients SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        let deleted = res.rows_affected() > 0;
        if deleted {
            info!(client_id=%id, "client soft-deleted");
        }
        Ok(deleted)
    }

    async fn fetch_client_any_state(&self, id: Uuid) -> Result<Option<Client>> {
        let rec = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rec)
    }
}
