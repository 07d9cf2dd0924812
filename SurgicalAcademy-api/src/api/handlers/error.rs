use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use surgical_academy_domain::services::{validation_message, ServiceError};

/// Error response format for API
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn validation_error(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            details,
            ..Self::new("validation_error", message)
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("forbidden", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("conflict", message)
    }

    /// Generic 500; the cause belongs in the logs, not the body
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a service failure, using `internal_message` for anything unexpected
    pub fn from_service(err: ServiceError, internal_message: &str) -> Self {
        match err {
            ServiceError::Validation(message) => {
                warn!("Rejected input: {}", message);
                Self::validation_error(message, None)
            }
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::Conflict(message) => Self::conflict(message),
            ServiceError::Unauthorized(message) => Self::unauthorized(message),
            ServiceError::Forbidden(message) => Self::forbidden(message),
            other => {
                error!("{}: {}", internal_message, other);
                Self::internal_error(internal_message)
            }
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        Self::from_service(err, "An unexpected error occurred")
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        Self::validation_error(validation_message(&errors), details)
    }
}

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Result type of JSON handlers
pub type ApiResult<T> = Result<T, ErrorResponse>;

/// Unwrap a JSON body and run its validators
pub fn validated<T: Validate>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    let Json(payload) = body?;
    payload.validate()?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("taken".into()), StatusCode::CONFLICT),
            (ServiceError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_errors_hide_the_cause() {
        let response = ErrorResponse::from_service(ServiceError::Internal("secret detail".into()), "AI search failed");
        assert_eq!(response.error, "internal_error");
        assert_eq!(response.message, "AI search failed");
    }
}
