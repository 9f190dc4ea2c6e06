//! API error types.

use aviary_store::StoreError;
use aviary_upstream::UpstreamError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error summary for programmatic handling.
    pub error: String,
    /// Human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    /// Get the summary string used as the `error` field.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
            Self::Store(e) => match e {
                StoreError::NotFound(_) => "not_found",
                StoreError::InvalidName(_) | StoreError::MissingHolder => "bad_request",
                StoreError::LeaseHeld { .. } => "conflict",
                _ => "storage_error",
            },
            Self::Upstream(e) => match e {
                UpstreamError::Unauthorized => "unauthorized",
                UpstreamError::Network(_) => "upstream_unavailable",
                UpstreamError::Status(_) => "upstream_error",
                UpstreamError::UnexpectedFormat(_) => "upstream_format",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(e) => match e {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InvalidName(_) | StoreError::MissingHolder => StatusCode::BAD_REQUEST,
                StoreError::LeaseHeld { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Upstream(e) => match e {
                UpstreamError::Unauthorized => StatusCode::UNAUTHORIZED,
                UpstreamError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                // Pass the provider's status through where it makes sense.
                UpstreamError::Status(code) => {
                    StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                UpstreamError::UnexpectedFormat(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.summary().to_string(),
            message: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_expected_statuses() {
        let held = ApiError::Store(StoreError::LeaseHeld {
            account: "a".to_string(),
            holder: "vps-1".to_string(),
        });
        assert_eq!(held.status_code(), StatusCode::CONFLICT);
        assert_eq!(held.summary(), "conflict");

        let missing = ApiError::Store(StoreError::NotFound("a".to_string()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let holder = ApiError::Store(StoreError::MissingHolder);
        assert_eq!(holder.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_map_to_expected_statuses() {
        assert_eq!(
            ApiError::Upstream(UpstreamError::Unauthorized).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Upstream(UpstreamError::Status(429)).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Upstream(UpstreamError::UnexpectedFormat("x".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
