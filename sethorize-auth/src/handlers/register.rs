use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use sethorize_db::{NewUser, TenantOperations, UserOperations};
use sethorize_error::AppError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AuthState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Creates a user under the default tenant. The account starts unverified;
/// verification happens out of band before the user can log in.
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("email and password required".into()));
    }

    let tenant = state
        .db
        .fetch_tenant_by_name(&state.cfg.application_name)
        .await?
        .ok_or(AppError::Internal)?;

    if state
        .db
        .fetch_user_by_email_in_tenant(&payload.email, tenant.id)
        .await?
        .is_some()
    {
        warn!(email=%payload.email, "registration failed - user already exists");
        return Err(AppError::BadRequest("user exists".into()));
    }

    let user = state
        .db
        .create_user(NewUser {
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password: payload.password,
            is_active: true,
            is_verified: false,
            is_admin: false,
            tenant_id: tenant.id,
        })
        .await?;
    info!(user_id=%user.id, email=%user.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }),
    ))
}
