//! Identity repository trait for the external identity/project store.

use async_trait::async_trait;

use crate::domain::entities::identity::{Identity, IdentityClass, IdentityFilter, NewIdentity};
use crate::errors::DomainError;

/// Repository for administrators and project users
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find the first identity matching every set field of `filter`
    async fn find_by_filter(&self, filter: &IdentityFilter) -> Result<Option<Identity>, DomainError>;

    /// Persist a new identity and return it with its assigned id
    async fn insert(&self, identity: NewIdentity) -> Result<Identity, DomainError>;

    /// Load the identity a token subject refers to
    ///
    /// # Returns
    /// * `Ok(None)` - No identity of this class has that id
    async fn resolve(&self, subject_id: i64, class: IdentityClass)
        -> Result<Option<Identity>, DomainError>;
}
