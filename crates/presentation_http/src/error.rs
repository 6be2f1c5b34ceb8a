//! API error handling
//!
//! Maps application errors onto HTTP status codes. In production mode,
//! upstream and internal details are replaced with generic messages.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether upstream and internal error details reach clients
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// What failed
        message: String,
        /// Whether the client should offer a retry
        retryable: bool,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Whether repeating the request may succeed
    pub retryable: bool,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, retryable, details) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, false, None),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, false, None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, false, None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, false, None),
            Self::ServiceUnavailable { message, retryable } => {
                let message = if should_expose_details() {
                    message
                } else {
                    "Service temporarily unavailable".to_string()
                };
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    message,
                    retryable,
                    None,
                )
            },
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
                false,
                should_expose_details().then_some(msg),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            retryable,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        let retryable = err.is_retryable();
        match err {
            ApplicationError::Domain(e @ DomainError::InvalidTransition { .. }) => {
                Self::Conflict(e.to_string())
            },
            ApplicationError::Domain(DomainError::NotFound { entity_type, id }) => {
                Self::NotFound(format!("{entity_type} {id}"))
            },
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            e @ (ApplicationError::DiscoveryUnavailable { .. }
            | ApplicationError::RoutingFailed(_)
            | ApplicationError::GeocodeFailed(_)
            | ApplicationError::LocationUnavailable(_)) => Self::ServiceUnavailable {
                message: e.to_string(),
                retryable,
            },
            ApplicationError::LocationDenied => {
                Self::Forbidden("Location permission denied".to_string())
            },
            ApplicationError::Cancelled => {
                Self::Conflict("Request was superseded or cancelled".to_string())
            },
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::InvalidInput(msg) => Self::BadRequest(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_messages() {
        assert_eq!(
            ApiError::BadRequest("invalid input".to_string()).to_string(),
            "Bad request: invalid input"
        );
        assert_eq!(
            ApiError::Conflict("busy".to_string()).to_string(),
            "Conflict: busy"
        );
    }

    #[test]
    fn error_response_serialization() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            retryable: false,
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"retryable\":false"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn discovery_unavailable_is_retryable_service_unavailable() {
        let err: ApiError = ApplicationError::DiscoveryUnavailable {
            attempts: 4,
            message: "HTTP 504".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            ApiError::ServiceUnavailable {
                retryable: true,
                ..
            }
        ));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_transition_is_conflict() {
        let err: ApiError = ApplicationError::Domain(DomainError::InvalidTransition {
            from: "idle".to_string(),
            event: "permission_denied".to_string(),
        })
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn invalid_coordinates_are_bad_request() {
        let err: ApiError =
            ApplicationError::Domain(DomainError::InvalidCoordinates("91, 0".to_string())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn location_denied_is_forbidden() {
        let err: ApiError = ApplicationError::LocationDenied.into();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn cancelled_is_conflict() {
        let err: ApiError = ApplicationError::Cancelled.into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn application_not_found_converts() {
        let err: ApiError = ApplicationError::NotFound("organization 7".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn configuration_error_is_internal() {
        let err: ApiError = ApplicationError::Configuration("bad".to_string()).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
