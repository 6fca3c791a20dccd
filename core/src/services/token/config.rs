//! Configuration for the token service

use std::time::Duration;

use atlas_shared::config::AuthConfig;
use jsonwebtoken::Algorithm;

use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,
    /// Deadline for a single revocation store call
    pub store_timeout: Duration,
    /// Keys requested per page when scanning active refresh tokens
    pub scan_batch_size: usize,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: atlas_shared::config::DEFAULT_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            access_ttl_seconds: 15 * 60,
            refresh_ttl_seconds: 30 * 86400,
            store_timeout: Duration::from_millis(2000),
            scan_batch_size: 100,
        }
    }
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Build from the application auth configuration
    pub fn from_auth_config(config: &AuthConfig) -> Result<Self, DomainError> {
        Ok(Self {
            jwt_secret: config.jwt.secret.clone(),
            algorithm: parse_algorithm(&config.jwt.algorithm)?,
            access_ttl_seconds: config.jwt.access_token_expiry as i64,
            refresh_ttl_seconds: config.jwt.refresh_token_expiry as i64,
            store_timeout: Duration::from_millis(config.store_timeout_ms),
            scan_batch_size: config.scan_batch_size.max(1),
        })
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}

/// Accept only the shared-secret algorithms
pub fn parse_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(DomainError::Validation {
            message: format!("unsupported JWT algorithm: {}", other),
        }),
    }
}
