//! Mock implementation of IdentityRepository for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::identity::{Identity, IdentityClass, IdentityFilter, NewIdentity};
use crate::errors::DomainError;

use super::r#trait::IdentityRepository;

#[derive(Clone)]
pub struct MockIdentityRepository {
    identities: Arc<RwLock<Vec<Identity>>>,
    next_id: Arc<AtomicI64>,
}

impl MockIdentityRepository {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Store an identity with a fixed id
    pub async fn add(&self, identity: Identity) {
        self.next_id.fetch_max(identity.id + 1, Ordering::SeqCst);
        self.identities.write().await.push(identity);
    }

    pub async fn count(&self) -> usize {
        self.identities.read().await.len()
    }
}

impl Default for MockIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRepository for MockIdentityRepository {
    async fn find_by_filter(&self, filter: &IdentityFilter) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities.iter().find(|i| filter.matches(i)).cloned())
    }

    async fn insert(&self, identity: NewIdentity) -> Result<Identity, DomainError> {
        let stored = Identity {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            class: identity.class,
            email: identity.email,
            login: identity.login,
            password_hash: identity.password_hash,
            project_id: identity.project_id,
            role: identity.role,
        };
        self.identities.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn resolve(&self, subject_id: i64, class: IdentityClass)
        -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities
            .iter()
            .find(|i| i.id == subject_id && i.class == class)
            .cloned())
    }
}
