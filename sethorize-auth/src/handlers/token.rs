use axum::{
    extract::{Form, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sethorize_crypto::{generate_secret, Argon2Hasher, SECRET_LEN};
use sethorize_db::{
    AuthCodeOperations, ClientOperations, NewRefreshToken, NewSession, RefreshTokenOperations,
    SessionOperations, TenantOperations, UserOperations,
};
use sethorize_error::AppError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bearer::{decode_composite, encode_composite};
use crate::tokens::{mint_client_token, mint_user_token, ACCESS_TOKEN_TTL_SECS};
use crate::AuthState;

#[derive(Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
pub struct ClientCredentialsResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: String,
}

/// Token endpoint: form-encoded, dispatching on `grant_type`.
pub async fn token(
    State(state): State<AuthState>,
    Form(request): Form<TokenRequest>,
) -> Result<Response, AppError> {
    debug!(grant_type=%request.grant_type, client_id=%request.client_id, "token request");
    match request.grant_type.as_str() {
        "authorization_code" => authorization_code_flow(&state, request).await,
        "refresh_token" => refresh_token_flow(&state, request).await,
        "client_credentials" => client_credentials_flow(&state, request).await,
        other => {
            warn!(grant_type=%other, "unsupported grant type");
            Err(AppError::BadRequest("unsupported grant_type".into()))
        }
    }
}

async fn authorization_code_flow(
    state: &AuthState,
    request: TokenRequest,
) -> Result<Response, AppError> {
    let code = request
        .code
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("code is required".into()))?;
    debug!(redirect_uri=?request.redirect_uri, scope=?request.scope, "authorization code flow");
    let (auth_code_id, code_plain) = decode_composite(code).ok_or(AppError::Unauthorized)?;

    // Atomic single-use transition: of two concurrent exchanges for the same
    // code, exactly one observes the row.
    let auth_code = state
        .db
        .consume_auth_code(auth_code_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;

    let hasher = Argon2Hasher::default();
    let code_valid = hasher
        .compare(&code_plain, &auth_code.code_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !code_valid {
        warn!(auth_code_id=%auth_code.id, "code exchange failed - secret mismatch");
        return Err(AppError::Unauthorized);
    }
    if auth_code.expires_at <= Utc::now() {
        warn!(auth_code_id=%auth_code.id, "code exchange failed - code expired");
        return Err(AppError::Unauthorized);
    }

    let user = state
        .db
        .fetch_active_verified_user_by_id(auth_code.user_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;
    let tenant = state
        .db
        .fetch_active_tenant_by_id(user.tenant_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;
    let client = state
        .db
        .fetch_active_client_by_id(auth_code.client_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;

    let secret_valid = hasher
        .compare(&request.client_secret, &client.secret_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !secret_valid {
        warn!(client_id=%client.id, "code exchange failed - client secret mismatch");
        return Err(AppError::Unauthorized);
    }

    let session = state
        .db
        .create_session(NewSession {
            user_id: Some(user.id),
            client_id: client.id,
        })
        .await?;
    let token_plain = generate_secret(SECRET_LEN);
    let refresh = state
        .db
        .create_refresh_token(NewRefreshToken {
            user_id: user.id,
            client_id: client.id,
            token: token_plain.clone(),
        })
        .await?;

    let access_token = mint_user_token(&state.keys, &user, &tenant, client.id, session.id)?;
    info!(user_id=%user.id, client_id=%client.id, session_id=%session.id, "authorization code exchanged");

    Ok(Json(TokenResponse {
        access_token,
        refresh_token: encode_composite(refresh.id, &token_plain),
        expires_in: ACCESS_TOKEN_TTL_SECS,
    })
    .into_response())
}

async fn refresh_token_flow(state: &AuthState, request: TokenRequest) -> Result<Response, AppError> {
    let refresh_token = request
        .refresh_token
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("refresh_token is required".into()))?;
    let (refresh_token_id, token_plain) =
        decode_composite(refresh_token).ok_or(AppError::Unauthorized)?;

    // Rotation: the consumed row is burned before anything else happens, so
    // a replay of the same bearer can never succeed.
    let consumed = state
        .db
        .consume_refresh_token(refresh_token_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;

    let user = state
        .db
        .fetch_active_verified_user_by_id(consumed.user_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;
    let tenant = state
        .db
        .fetch_active_tenant_by_id(user.tenant_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;
    let client = state
        .db
        .fetch_active_client_by_id(consumed.client_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;

    let hasher = Argon2Hasher::default();
    let secret_valid = hasher
        .compare(&request.client_secret, &client.secret_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !secret_valid {
        warn!(client_id=%client.id, "refresh failed - client secret mismatch");
        return Err(AppError::Unauthorized);
    }
    let token_valid = hasher
        .compare(&token_plain, &consumed.token_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !token_valid {
        warn!(refresh_token_id=%consumed.id, "refresh failed - token secret mismatch");
        return Err(AppError::Unauthorized);
    }

    let session = state
        .db
        .create_session(NewSession {
            user_id: Some(user.id),
            client_id: client.id,
        })
        .await?;
    let next_plain = generate_secret(SECRET_LEN);
    let next_refresh = state
        .db
        .create_refresh_token(NewRefreshToken {
            user_id: user.id,
            client_id: client.id,
            token: next_plain.clone(),
        })
        .await?;

    let access_token = mint_user_token(&state.keys, &user, &tenant, client.id, session.id)?;
    info!(user_id=%user.id, client_id=%client.id, session_id=%session.id, rotated_from=%consumed.id, "refresh token rotated");

    Ok(Json(TokenResponse {
        access_token,
        refresh_token: encode_composite(next_refresh.id, &next_plain),
        expires_in: ACCESS_TOKEN_TTL_SECS,
    })
    .into_response())
}

async fn client_credentials_flow(
    state: &AuthState,
    request: TokenRequest,
) -> Result<Response, AppError> {
    let client_id = Uuid::parse_str(&request.client_id).map_err(|_| AppError::Unauthorized)?;
    let client = state
        .db
        .fetch_active_client_by_id(client_id)
        .await
        .map_err(|_| AppError::Unauthorized)?
        .ok_or(AppError::Unauthorized)?;

    let secret_valid = Argon2Hasher::default()
        .compare(&request.client_secret, &client.secret_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !secret_valid {
        warn!(client_id=%client.id, "client credentials failed - secret mismatch");
        return Err(AppError::Unauthorized);
    }

    // No user behind this grant; the session carries only the client.
    let session = state
        .db
        .create_session(NewSession {
            user_id: None,
            client_id: client.id,
        })
        .await?;

    let access_token = mint_client_token(&state.keys, &client, session.id)?;
    info!(client_id=%client.id, session_id=%session.id, "client credentials granted");

    Ok(Json(ClientCredentialsResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_TTL_SECS,
        scope: client.scopes.join(" "),
    })
    .into_response())
}
