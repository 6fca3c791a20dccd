//! Token and authentication error kinds
//!
//! The HTTP layer collapses every variant here into one `unauthenticated`
//! response. The distinctions exist for logs and tests.

use thiserror::Error;

/// Token decoding, validation and issuance failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token revoked")]
    Revoked,

    #[error("Unexpected token kind")]
    WrongKind,

    #[error("Token issued for another identity class")]
    WrongClass,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Identity not found")]
    IdentityNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Identity already exists: {field}")]
    IdentityExists { field: String },

    #[error("Insufficient permissions")]
    Forbidden,
}
