use crate::models::{Db, NewSession, Session};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Sessions outlive the access tokens minted against them; the JWT `exp`
/// bounds the effective bearer window.
pub const SESSION_TTL_HOURS: i64 = 24;

#[async_trait]
pub trait SessionOperations {
    async fn create_session(&self, ns: NewSession) -> Result<Session>;
    /// A session is live iff it is not revoked and not past its expiry.
    async fn fetch_live_session(&self, id: Uuid, client_id: Uuid) -> Result<Option<Session>>;
    async fn revoke_session(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
impl SessionOperations for Db {
    async fn create_session(&self, ns: NewSession) -> Result<Session> {
        let expires_at = chrono::Utc::now() + Duration::hours(SESSION_TTL_HOURS);
        let rec = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, client_id, expires_at) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(ns.user_id)
        .bind(ns.client_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        debug!(session_id=%rec.id, client_id=%rec.client_id, "session created");
        Ok(rec)
    }

    async fn fetch_live_session(&self, id: Uuid, client_id: Uuid) -> Result<Option<Session>> {
        let rec = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE id = $1 AND client_id = $2 \
             AND revoked_at IS NULL AND expires_at > now() AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn revoke_session(&self, id: Uuid) -> Result<bool> {
        // No-op when already revoked, which makes logout idempotent.
        let res = sqlx::query(
            "UPDATE sessions SET revoked_at = now(), updated_at = now() \
             WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        let revoked = res.rows_affected() > 0;
        if revoked {
            info!(session_id=%id, "session revoked");
        }
        Ok(revoked)
    }
}
