use crate::models::{Consent, Db, NewConsent};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use tracing::debug;
use uuid::Uuid;

pub const CONSENT_TTL_DAYS: i64 = 30;

#[async_trait]
pub trait ConsentOperations {
    async fn create_consent(&self, nc: NewConsent) -> Result<Consent>;
    /// At most one live consent exists per (user, client).
    async fn fetch_consent(&self, user_id: Uuid, client_id: Uuid) -> Result<Option<Consent>>;
    async fn soft_delete_consent(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
impl ConsentOperations for Db {
    async fn create_consent(&self, nc: NewConsent) -> Result<Consent> {
        let expires_at = chrono::Utc::now() + Duration::days(CONSENT_TTL_DAYS);
        let rec = sqlx::query_as::<_, Consent>(
            "INSERT INTO consents (user_id, client_id, auth_code_id, scopes, expires_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(nc.user_id)
        .bind(nc.client_id)
        .bind(nc.auth_code_id)
        .bind(&nc.scopes)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        debug!(consent_id=%rec.id, user_id=%rec.user_id, client_id=%rec.client_id, "consent created");
        Ok(rec)
    }

    async fn fetch_consent(&self, user_id: Uuid, client_id: Uuid) -> Result<Option<Consent>> {
        let rec = sqlx::query_as::<_, Consent>(
            "SELECT * FROM consents WHERE user_id = $1 AND client_id = $2 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn soft_delete_consent(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE consents SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
