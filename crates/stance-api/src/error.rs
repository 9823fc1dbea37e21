//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stance_media::MediaError;
use stance_models::UploadError;
use thiserror::Error;

use crate::config::is_production_environment;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Upload exceeds the maximum allowed size")]
    PayloadTooLarge,

    #[error("Analysis Error: Analysis did not finish within {0} seconds")]
    Timeout(u64),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Server Processing Error: {0}")]
    Internal(String),

    #[error("Analysis Error: {0}")]
    Media(#[from] MediaError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Failure category for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid_input",
            ApiError::PayloadTooLarge => "payload_too_large",
            ApiError::Timeout(_) => "timeout",
            ApiError::Unavailable(_) => "unavailable",
            ApiError::Internal(_) => "unexpected",
            ApiError::Media(e) => e.kind(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_)
            | ApiError::Internal(_)
            | ApiError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let production = std::env::var("ENVIRONMENT")
            .map(|env| is_production_environment(&env))
            .unwrap_or(false);
        let detail = self.detail(production);

        (self.status_code(), Json(ErrorResponse { detail })).into_response()
    }
}

impl ApiError {
    /// Client-facing message. Internal error details are hidden in production.
    fn detail(&self, production: bool) -> String {
        match self {
            ApiError::Internal(_) if production => {
                "Server Processing Error: An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}
