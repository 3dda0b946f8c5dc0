use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use sethorize_crypto::Argon2Hasher;
use sethorize_db::UserOperations;
use sethorize_error::AppError;
use sethorize_middleware::types::CurrentSession;
use tracing::{info, warn};

use crate::AuthState;

#[derive(Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct PasswordChangeResponse {
    pub message: String,
}

/// Rotates the stored password hash after verifying the current password.
/// Existing sessions stay live; logout handles explicit revocation.
pub async fn change_password(
    State(state): State<AuthState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = session
        .user_id
        .ok_or_else(|| AppError::BadRequest("session has no user".into()))?;
    let user = state
        .db
        .fetch_user_by_id(user_id)
        .await?
        .ok_or(AppError::Internal)?;

    let hasher = Argon2Hasher::default();
    let current_valid = hasher
        .compare(&payload.current_password, &user.password_hash)
        .map_err(|_| AppError::Internal)?;
    if !current_valid {
        warn!(user_id=%user.id, "password change rejected - current password mismatch");
        return Err(AppError::BadRequest("invalid current password".into()));
    }

    let new_hash = hasher
        .hash(&payload.new_password)
        .map_err(|_| AppError::Internal)?;
    state.db.update_user_password(user.id, &new_hash).await?;
    info!(user_id=%user.id, "password changed");

    Ok(Json(PasswordChangeResponse {
        message: "Password changed successfully".to_string(),
    }))
}
