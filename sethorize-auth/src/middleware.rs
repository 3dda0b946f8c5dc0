use axum::body::Body;
use axum::http::{header, Request};
use axum::{extract::State, middleware::Next, response::Response};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sethorize_crypto::Argon2Hasher;
use sethorize_db::{ClientOperations, SessionOperations};
use sethorize_error::AppError;
use sethorize_middleware::types::{CurrentClient, CurrentSession};
use uuid::Uuid;

use crate::tokens::verify_token;
use crate::utils::extract_bearer_token;
use crate::AuthState;

/// Client credential gate: the bearer is base64 of `client_id:client_secret`;
/// the secret is verified against the stored argon2 hash.
pub async fn client_guard(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = extract_bearer_token(auth_header).ok_or(AppError::Unauthorized)?;
    let decoded = STANDARD.decode(&token).map_err(|_| AppError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;
    let (client_id, client_secret) = decoded.split_once(':').ok_or(AppError::Unauthorized)?;
    let client_id = Uuid::parse_str(client_id).map_err(|_| AppError::Unauthorized)?;

    let client = state
        .db
        .fetch_active_client_by_id(client_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;
    let valid = Argon2Hasher::default()
        .compare(client_secret, &client.secret_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !valid {
        tracing::warn!(client_id=%client.id, "client authentication failed");
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(CurrentClient(client));
    Ok(next.run(req).await)
}

/// User session gate: verifies the RS256 access token, then requires a live
/// session matching the token's `sid` and `aud` claims. The session rides
/// along as a typed request extension.
pub async fn session_guard(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = extract_bearer_token(auth_header).ok_or(AppError::Unauthorized)?;
    let claims = verify_token(&state.keys, &token)?;
    let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::Unauthorized)?;
    let client_id = Uuid::parse_str(&claims.aud).map_err(|_| AppError::Unauthorized)?;

    let session = state
        .db
        .fetch_live_session(session_id, client_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(req).await)
}
