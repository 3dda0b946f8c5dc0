use crate::models::{AuthCode, Db, NewAuthCode};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use sethorize_crypto::Argon2Hasher;
use tracing::debug;
use uuid::Uuid;

pub const AUTH_CODE_TTL_MINUTES: i64 = 5;

#[async_trait]
pub trait AuthCodeOperations {
    async fn create_auth_code(&self, nac: NewAuthCode) -> Result<AuthCode>;
    /// Single-use transition: flips `used_at` from NULL to now and returns
    /// the row, atomically. A concurrent second consumer sees no row.
    async fn consume_auth_code(&self, id: Uuid) -> Result<Option<AuthCode>>;
}

#[async_trait]
impl AuthCodeOperations for Db {
    async fn create_auth_code(&self, nac: NewAuthCode) -> Result<AuthCode> {
        // Pre-insert hook: hash the plaintext code and stamp the expiry
        // window before the row exists.
        let code_hash = Argon2Hasher::default().hash(&nac.code)?;
        let expires_at = chrono::Utc::now() + Duration::minutes(AUTH_CODE_TTL_MINUTES);
        let rec = sqlx::query_as::<_, AuthCode>(
            "INSERT INTO auth_codes (client_id, user_id, code_hash, scopes, redirect_uri, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(nac.client_id)
        .bind(nac.user_id)
        .bind(&code_hash)
        .bind(&nac.scopes)
        .bind(&nac.redirect_uri)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        debug!(auth_code_id=%rec.id, client_id=%rec.client_id, "auth code created");
        Ok(rec)
    }

    async fn consume_auth_code(&self, id: Uuid) -> Result<Option<AuthCode>> {
        let rec = sqlx::query_as::<_, AuthCode>(
            "UPDATE auth_codes SET used_at = now() WHERE id = $1 AND used_at IS NULL RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(ref code) = rec {
            debug!(auth_code_id=%code.id, "auth code consumed");
        }
        Ok(rec)
    }
}
