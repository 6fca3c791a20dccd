//! In-memory identity repository for development and tests

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use atlas_core::domain::entities::identity::{Identity, IdentityClass, IdentityFilter, NewIdentity};
use atlas_core::errors::{AuthError, DomainError};
use atlas_core::repositories::IdentityRepository;

/// Identity store kept in process memory
///
/// Enforces the same uniqueness a relational store would: email and login
/// are unique per class and project.
#[derive(Clone)]
pub struct MemoryIdentityRepository {
    identities: Arc<RwLock<Vec<Identity>>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MemoryIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn find_by_filter(&self, filter: &IdentityFilter) -> Result<Option<Identity>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities.iter().find(|i| filter.matches(i)).cloned())
    }

    async fn insert(&self, identity: NewIdentity) -> Result<Identity, DomainError> {
        let mut identities = self.identities.write().await;

        let same_scope = |i: &&Identity| i.class == identity.class && i.project_id == identity.project_id;
        if identities
            .iter()
            .filter(same_scope)
            .any(|i| i.email.eq_ignore_ascii_case(&identity.email))
        {
            return Err(AuthError::IdentityExists { field: "email".to_string() }.into());
        }
        if identities.iter().filter(same_scope).any(|i| i.login == identity.login) {
            return Err(AuthError::IdentityExists { field: "login".to_string() }.into());
        }

        let stored = Identity {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            class: identity.class,
            email: identity.email,
            login: identity.login,
            password_hash: identity.password_hash,
            project_id: identity.project_id,
            role: identity.role,
        };
        identities.push(stored.clone());
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
