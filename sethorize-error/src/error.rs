use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

// Stable machine codes travel next to the human-readable message so clients
// never have to parse display text.

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error")]
    Internal,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound => {
                info!(error_code="not_found", status_code=%StatusCode::NOT_FOUND, "resource not found");
                (StatusCode::NOT_FOUND, "not_found")
            }
            // Every credential failure collapses to the same body so callers
            // cannot probe which verification step rejected them.
            AppError::Unauthorized => {
                warn!(error_code="invalid_credentials", status_code=%StatusCode::UNAUTHORIZED, "authentication failed");
                (StatusCode::UNAUTHORIZED, "invalid_credentials")
            }
            AppError::MethodNotAllowed => {
                info!(error_code="method_not_allowed", status_code=%StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
                (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
            }
            AppError::BadRequest(msg) => {
                warn!(error_code="bad_request", status_code=%StatusCode::BAD_REQUEST, message=%msg, "bad request error");
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            AppError::Internal => {
                error!(error_code="internal_error", status_code=%StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
            code: Some(code.to_string()),
        });
        let mut response = (status, body).into_response();
        if let Ok(hv) = HeaderValue::from_str(code) {
            response.headers_mut().insert("x-error-code", hv);
        }
        response
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        error!(source_error=%err, "converting anyhow error to AppError");
        AppError::Internal
    }
}
