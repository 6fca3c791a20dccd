//! bcrypt implementation of the password hashing capability

use atlas_core::errors::DomainError;
use atlas_core::services::auth::PasswordHasher;

/// bcrypt with a configurable work factor
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            DomainError::internal("password hashing failed")
        })
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, DomainError> {
        bcrypt::verify(password, digest).map_err(|e| {
            tracing::error!(error = %e, "Stored password digest is unusable");
            DomainError::internal("password verification failed")
        })
    }
}
