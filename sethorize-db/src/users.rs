use crate::models::{Db, NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use sethorize_crypto::Argon2Hasher;
use tracing::{debug, info};
use uuid::Uuid;

#[async_trait]
pub trait UserOperations {
    async fn create_user(&self, nu: NewUser) -> Result<User>;
    /// Lookup used by the login flow: the account must be active and verified.
    async fn fetch_login_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn fetch_active_verified_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn fetch_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn fetch_user_by_email_in_tenant(
        &self,
        email: &str,
        tenant_id: Uuid,
    ) -> Result<Option<User>>;
    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<Option<User>>;
}

#[async_trait]
impl UserOperations for Db {
    async fn create_user(&self, nu: NewUser) -> Result<User> {
        debug!(email=%nu.email, tenant_id=%nu.tenant_id, "creating new user");
        // Pre-insert hook: derive the display name and hash the password so
        // the row never exists with plaintext credentials.
        let display_name = format!("{} {}", nu.first_name, nu.last_name);
        let password_hash = Argon2Hasher::default().hash(&nu.password)?;
        let rec = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, first_name, last_name, display_name, password_hash, is_active, is_verified, is_admin, tenant_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&nu.email)
        .bind(&nu.first_name)
        .bind(&nu.last_name)
        .bind(&display_name)
        .bind(&password_hash)
        .bind(nu.is_active)
        .bind(nu.is_verified)
        .bind(nu.is_admin)
        .bind(nu.tenant_id)
        .fetch_one(&self.pool)
        .await?;
        info!(user_id=%rec.id, email=%rec.email, "user created");
        Ok(rec)
    }

    async fn fetch_login_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let rec = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND is_active AND is_verified AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn fetch_active_verified_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let rec = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND is_active AND is_verified AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn fetch_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let rec =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(rec)
    }

    async fn fetch_user_by_email_in_tenant(
        &self,
        email: &str,
        tenant_id: Uuid,
    ) -> Result<Option<User>> {
        let rec = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND tenant_id = $2 AND deleted_at IS NULL",
        )
        .bind(email)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<Option<User>> {
        debug!(user_id=%id, "updating user password");
        let rec = sqlx::query_as::<_, User>(
            "UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2 AND deleted_at IS NULL RETURNING *",
        )
        .bind(password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(ref user) = rec {
            info!(user_id=%user.id, "user password updated");
        }
        Ok(rec)
    }
}
