use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meter_core::WaveformError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Meter {meter_id} not found")]
    NotFound { meter_id: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Rate limit exceeded. Maximum {limit} requests per second.")]
    RateLimited { limit: u32 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<WaveformError> for ApiError {
    fn from(e: WaveformError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::RateLimited { .. } => json!({ "error": self.to_string() }),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while serving request");
                json!({ "detail": "Internal server error" })
            }
            _ => json!({ "detail": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
