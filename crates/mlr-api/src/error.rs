//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// User-visible message for any metadata lookup failure.
pub const METADATA_FAILURE_MESSAGE: &str = "Failed to fetch video details";

/// User-visible message for any payment initialization failure.
pub const PAYMENT_FAILURE_MESSAGE: &str = "Failed to initialize payment";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// A collaborator failed. `public` is shown to the user, `internal` is
    /// only logged.
    #[error("Upstream error: {internal}")]
    Upstream {
        public: &'static str,
        internal: String,
    },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn upstream(public: &'static str, internal: impl Into<String>) -> Self {
        Self::Upstream {
            public,
            internal: internal.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedPlatform(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::UnsupportedPlatform(_) => Some("unsupported_platform"),
            ApiError::Upstream { .. } => Some("upstream_failure"),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            // Collaborator failures never expose their cause.
            ApiError::Upstream { public, .. } => public.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code().map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}
