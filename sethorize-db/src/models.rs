use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shared database handle. Cheap to clone; the pool is internally
/// reference-counted and safe across tasks.
#[derive(Clone)]
pub struct Db {
    pub pool: sqlx::PgPool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_admin: bool,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    // Stored hashes never leave the process in a response body.
    #[serde(skip_serializing)]
    pub secret_hash: String,
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
    pub is_active: bool,
    pub is_internal: bool,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    /// None for client-credentials sessions.
    pub user_id: Option<Uuid>,
    pub client_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthCode {
    pub id: Uuid,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub code_hash: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Consent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub auth_code_id: Uuid,
    pub scopes: Vec<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert payload for `create_user`. The password arrives as plaintext and is
/// hashed by the pre-insert hook; `display_name` is derived there as well.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_admin: bool,
    pub tenant_id: Uuid,
}

/// Insert payload for `create_client`; `secret` is plaintext until the hook.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub secret: String,
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
    pub is_internal: bool,
    pub tenant_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Option<Uuid>,
    pub client_id: Uuid,
}

/// Insert payload for `create_auth_code`; `code` is plaintext until the hook.
#[derive(Debug, Clone)]
pub struct NewAuthCode {
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
}

/// Insert payload for `create_refresh_token`; `token` is plaintext until the hook.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct NewConsent {
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub auth_code_id: Uuid,
    pub scopes: Vec<String>,
}
