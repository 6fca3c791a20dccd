//! Mapping of domain errors to HTTP responses
//!
//! Every token and session failure becomes the same 401 body. The reason is
//! only written to the log.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use validator::ValidationErrors;

use atlas_core::errors::{AuthError, DomainError};
use atlas_shared::errors::{error_codes, ErrorResponse};

/// Error returned by handlers and the session middleware
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ApiError {
    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => {
                let mut fields: Vec<String> =
                    errors.field_errors().keys().map(|k| k.to_string()).collect();
                fields.sort();
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed")
                    .add_detail("fields", fields)
            }
            ApiError::Domain(DomainError::Validation { message }) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.as_str())
            }
            ApiError::Domain(DomainError::Auth(AuthError::IdentityExists { field })) => {
                ErrorResponse::new(error_codes::CONFLICT, format!("{} is already registered", field))
                    .add_detail("field", field)
            }
            ApiError::Domain(DomainError::Auth(AuthError::Forbidden)) => {
                ErrorResponse::new(error_codes::FORBIDDEN, "Access denied")
            }
            ApiError::Domain(DomainError::Auth(AuthError::InvalidCredentials)) => {
                ErrorResponse::new(error_codes::UNAUTHENTICATED, "Invalid email or password")
            }
            ApiError::Domain(DomainError::Internal { .. }) => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
            ApiError::Domain(_) => {
                ErrorResponse::new(error_codes::UNAUTHENTICATED, "Authentication required")
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(error) => match error {
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::Auth(AuthError::IdentityExists { .. }) => StatusCode::CONFLICT,
                DomainError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
                DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                // Token failures, missing identities and store outages alike
                DomainError::Auth(_) | DomainError::Token(_) | DomainError::StoreUnavailable { .. } => {
                    StatusCode::UNAUTHORIZED
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Domain(e @ DomainError::StoreUnavailable { .. }) => {
                tracing::error!(error = %e, "Revocation store unavailable, rejecting request");
            }
            ApiError::Domain(e @ DomainError::Internal { .. }) => {
                tracing::error!(error = %e, "Internal error");
            }
            other => tracing::debug!(error = %other, "Request rejected"),
        }

        HttpResponse::build(self.status_code()).json(self.body())
    }
}
