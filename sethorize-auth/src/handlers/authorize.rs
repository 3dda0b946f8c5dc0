use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use sethorize_crypto::{generate_secret, SECRET_LEN};
use sethorize_db::{AuthCodeOperations, ClientOperations, ConsentOperations, NewAuthCode, NewConsent};
use sethorize_error::AppError;
use sethorize_middleware::types::CurrentSession;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bearer::encode_composite;
use crate::utils::split_scopes;
use crate::AuthState;

#[derive(Deserialize)]
pub struct AuthorizeRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub response_type: String,
    pub scope: String,
    pub state: String,
}

#[derive(Serialize)]
pub struct AuthorizeResponse {
    pub code: String,
    pub state: String,
}

/// Issues a single-use authorization code bound to the session's user and
/// replaces any existing consent for the (user, client) pair.
pub async fn authorize(
    State(state): State<AuthState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(payload): Json<AuthorizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(session_id=%session.id, client_id=%payload.client_id, response_type=%payload.response_type, "authorize request");

    let client_id = Uuid::parse_str(&payload.client_id)
        .map_err(|_| AppError::BadRequest("client_id must be a uuid".into()))?;
    let client = state
        .db
        .fetch_client_by_id(client_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("client not found".into()))?;

    if !client.redirect_uris.contains(&payload.redirect_uri) {
        warn!(client_id=%client.id, redirect_uri=%payload.redirect_uri, "authorize rejected - redirect uri not allowed");
        return Err(AppError::BadRequest("invalid redirect uri".into()));
    }

    let user_id = session
        .user_id
        .ok_or_else(|| AppError::BadRequest("session has no user".into()))?;

    // At most one live consent per (user, client): drop the old one first.
    if let Some(existing) = state.db.fetch_consent(user_id, client.id).await? {
        state.db.soft_delete_consent(existing.id).await?;
    }

    let scopes = split_scopes(&payload.scope);
    let code_plain = generate_secret(SECRET_LEN);
    let auth_code = state
        .db
        .create_auth_code(NewAuthCode {
            client_id: client.id,
            user_id,
            code: code_plain.clone(),
            scopes: scopes.clone(),
            redirect_uri: payload.redirect_uri.clone(),
        })
        .await?;

    state
        .db
        .create_consent(NewConsent {
            user_id,
            client_id: client.id,
            auth_code_id: auth_code.id,
            scopes,
        })
        .await?;

    info!(auth_code_id=%auth_code.id, user_id=%user_id, client_id=%client.id, "authorization code issued");

    // The plaintext code leaves the process exactly once, inside the
    // composite bearer.
    Ok(Json(AuthorizeResponse {
        code: encode_composite(auth_code.id, &code_plain),
        state: payload.state,
    }))
}
