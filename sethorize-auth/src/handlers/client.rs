use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use sethorize_db::{ClientOperations, ConsentOperations};
use sethorize_error::AppError;
use uuid::Uuid;

use crate::AuthState;

#[derive(Deserialize)]
pub struct ClientRequest {
    pub client_id: String,
    pub user_id: String,
}

/// Client metadata plus a consent probe for the (user, client) pair. The
/// response flattens the client fields and adds `consent` and the granted
/// `scopes`; the stored secret hash never serializes.
pub async fn client(
    State(state): State<AuthState>,
    Json(payload): Json<ClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client_id = Uuid::parse_str(&payload.client_id)
        .map_err(|_| AppError::BadRequest("client_id must be a uuid".into()))?;
    let user_id = Uuid::parse_str(&payload.user_id)
        .map_err(|_| AppError::BadRequest("user_id must be a uuid".into()))?;

    let client = state
        .db
        .fetch_active_client_by_id(client_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("client not found".into()))?;

    let consent = state.db.fetch_consent(user_id, client_id).await?;
    let (has_consent, scopes) = match &consent {
        Some(c) => (true, c.scopes.clone()),
        None => (false, Vec::new()),
    };

    let mut body = serde_json::to_value(&client).map_err(|_| AppError::Internal)?;
    body["consent"] = json!(has_consent);
    body["scopes"] = json!(scopes);
    Ok(Json(body))
}
