use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Serialize;
use sethorize_db::SessionOperations;
use sethorize_error::AppError;
use sethorize_middleware::types::CurrentSession;
use tracing::info;

use crate::AuthState;

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Revokes the current session. A second call with an already revoked
/// session never reaches this handler; the guard rejects the bearer.
pub async fn logout(
    State(state): State<AuthState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, AppError> {
    state.db.revoke_session(session.id).await?;
    info!(session_id=%session.id, "logout");
    Ok(Json(LogoutResponse {
        message: "OK".to_string(),
    }))
}
