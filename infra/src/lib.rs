//! # Infrastructure Layer
//!
//! Concrete implementations of the interfaces defined in `atlas_core`:
//! - **Cache**: Redis client and the Redis/in-memory revocation stores
//! - **Repositories**: in-memory identity repository
//! - **Security**: bcrypt password hashing

pub mod cache;
pub mod repositories;
pub mod security;

pub use cache::{MemoryRevocationStore, RedisClient, RedisRevocationStore};
pub use repositories::MemoryIdentityRepository;
pub use security::BcryptPasswordHasher;

use atlas_core::errors::DomainError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// No answer within the configured time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::store_unavailable(err.to_string())
    }
}
