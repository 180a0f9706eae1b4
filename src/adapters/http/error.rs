//! HTTP error mapping.
//!
//! Translates domain errors into status codes and a stable JSON error
//! shape. This is the only place the taxonomy meets HTTP.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Domain error carried through an HTTP handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.code {
            ErrorCode::UserNotFound | ErrorCode::CourseNotFound | ErrorCode::OrderNotFound => {
                StatusCode::NOT_FOUND
            }

            ErrorCode::AlreadyPurchased
            | ErrorCode::PaymentAlreadyCompleted
            | ErrorCode::CannotCancelCompleted
            | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,

            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,

            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,

            ErrorCode::PaymentProviderError => StatusCode::BAD_GATEWAY,

            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = %self.0.code, message = %self.0.message, "Request failed");
        } else {
            tracing::debug!(code = %self.0.code, message = %self.0.message, "Request rejected");
        }

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(code: ErrorCode) -> StatusCode {
        ApiError(DomainError::new(code, "test")).status_code()
    }

    #[test]
    fn not_found_codes_map_to_404() {
        assert_eq!(status_for(ErrorCode::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::CourseNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::OrderNotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_codes_map_to_409() {
        assert_eq!(status_for(ErrorCode::AlreadyPurchased), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorCode::PaymentAlreadyCompleted),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(ErrorCode::CannotCancelCompleted),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(status_for(ErrorCode::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn provider_errors_map_to_502() {
        assert_eq!(
            status_for(ErrorCode::PaymentProviderError),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn infrastructure_errors_map_to_500() {
        assert_eq!(
            status_for(ErrorCode::DatabaseError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
