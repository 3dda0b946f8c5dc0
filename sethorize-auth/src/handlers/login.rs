use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use sethorize_crypto::Argon2Hasher;
use sethorize_db::{
    ClientOperations, NewSession, SessionOperations, TenantOperations, UserOperations,
};
use sethorize_error::AppError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::tokens::{mint_user_token, ACCESS_TOKEN_TTL_SECS};
use crate::AuthState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub client_id: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: String,
}

pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(username=%payload.username, "login attempt");
    if payload.client_id.is_empty() {
        return Err(AppError::BadRequest("client_id is required".into()));
    }

    // client_id may be a uuid or a slug
    let client = match Uuid::parse_str(&payload.client_id) {
        Ok(id) => state.db.fetch_client_by_id(id).await?,
        Err(_) => state.db.fetch_client_by_slug(&payload.client_id).await?,
    };
    let Some(client) = client else {
        warn!(client_id=%payload.client_id, "login failed - client not found");
        return Err(AppError::NotFound);
    };

    let Some(user) = state.db.fetch_login_user_by_email(&payload.username).await? else {
        warn!(username=%payload.username, "login failed - user not found");
        return Err(AppError::NotFound);
    };

    let valid = Argon2Hasher::default()
        .compare(&payload.password, &user.password_hash)
        .map_err(|_| AppError::Internal)?;
    if !valid {
        warn!(user_id=%user.id, "login failed - bad password");
        return Err(AppError::Unauthorized);
    }

    let tenant = state
        .db
        .fetch_active_tenant_by_id(user.tenant_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let session = state
        .db
        .create_session(NewSession {
            user_id: Some(user.id),
            client_id: client.id,
        })
        .await?;

    let access_token = mint_user_token(&state.keys, &user, &tenant, client.id, session.id)?;
    info!(user_id=%user.id, client_id=%client.id, session_id=%session.id, "login successful");

    Ok(Json(LoginResponse {
        access_token,
        expires_in: ACCESS_TOKEN_TTL_SECS,
        token_type: "Bearer".to_string(),
        scope: "read".to_string(),
    }))
}
