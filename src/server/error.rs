use crate::errors::{DomainError, ServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;

/// A failed request: the status plus the flat `{error}` body the client sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// Map a service failure; anything unexpected becomes a 500 carrying `failure_message`
    pub fn from_service(err: ServiceError, failure_message: &str) -> Self {
        match err {
            ServiceError::Authentication(reason) => {
                warn!("Rejected request: {}", reason);
                Self::unauthorized()
            }
            ServiceError::SessionExpired => Self::unauthorized(),
            ServiceError::PermissionDenied(reason) => {
                warn!("Access denied: {}", reason);
                Self::new(StatusCode::FORBIDDEN, "Access Denied")
            }
            ServiceError::Domain(DomainError::Validation(validation)) => Self::bad_request(validation.to_string()),
            other => {
                error!("{}: {}", failure_message, other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
