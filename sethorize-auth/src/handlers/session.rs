use axum::{response::IntoResponse, Extension, Json};
use serde::Serialize;
use sethorize_middleware::types::CurrentSession;
use uuid::Uuid;

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub message: String,
}

pub async fn session(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> impl IntoResponse {
    Json(SessionResponse {
        id: session.id,
        message: "OK".to_string(),
    })
}
