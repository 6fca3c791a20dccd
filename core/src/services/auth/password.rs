//! Password hashing capability consumed by the auth service

use crate::errors::DomainError;

/// Opaque one-way password hashing
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// `Ok(false)` for a wrong password; `Err` only when the digest is unusable
    fn verify(&self, password: &str, digest: &str) -> Result<bool, DomainError>;
}
