use crate::models::{Db, NewRefreshToken, RefreshToken};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use sethorize_crypto::Argon2Hasher;
use tracing::debug;
use uuid::Uuid;

pub const REFRESH_TOKEN_TTL_HOURS: i64 = 24;

#[async_trait]
pub trait RefreshTokenOperations {
    async fn create_refresh_token(&self, nrt: NewRefreshToken) -> Result<RefreshToken>;
    /// Rotation step: burns the row by setting `used_at`, atomically with
    /// the liveness conditions. The consumed row is permanently unusable.
    async fn consume_refresh_token(&self, id: Uuid) -> Result<Option<RefreshToken>>;
}

#[async_trait]
impl RefreshTokenOperations for Db {
    async fn create_refresh_token(&self, nrt: NewRefreshToken) -> Result<RefreshToken> {
        // Pre-insert hook: hash the plaintext token and stamp the expiry.
        let token_hash = Argon2Hasher::default().hash(&nrt.token)?;
        let expires_at = chrono::Utc::now() + Duration::hours(REFRESH_TOKEN_TTL_HOURS);
        let rec = sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (user_id, client_id, token_hash, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(nrt.user_id)
        .bind(nrt.client_id)
        .bind(&token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        debug!(refresh_token_id=%rec.id, client_id=%rec.client_id, "refresh token created");
        Ok(rec)
    }

    async fn consume_refresh_token(&self, id: Uuid) -> Result<Option<RefreshToken>> {
        let rec = sqlx::query_as::<_, RefreshToken>(
            "UPDATE refresh_tokens SET used_at = now(), updated_at = now() \
             WHERE id = $1 AND expires_at > now() AND revoked_at IS NULL AND used_at IS NULL \
             AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(ref token) = rec {
            debug!(refresh_token_id=%token.id, "refresh token consumed");
        }
        Ok(rec)
    }
}
