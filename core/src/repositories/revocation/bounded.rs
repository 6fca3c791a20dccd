//! Per-call deadline around any revocation store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::errors::DomainError;

use super::r#trait::RevocationStore;

/// Wraps a store so that no call waits longer than `limit`
///
/// An expired deadline becomes `DomainError::StoreUnavailable`, the same kind
/// the store reports for its own failures.
pub struct BoundedStore<S: ?Sized> {
    inner: Arc<S>,
    limit: Duration,
}

impl<S: ?Sized> Clone for BoundedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limit: self.limit,
        }
    }
}

impl<S: RevocationStore + ?Sized> BoundedStore<S> {
    pub fn new(inner: Arc<S>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, DomainError>
    where
        F: std::future::Future<Output = Result<T, DomainError>> + Send,
    {
        match timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_ms = self.limit.as_millis() as u64,
                    "Revocation store call timed out"
                );
                Err(DomainError::store_unavailable(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.limit.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl<S: RevocationStore + ?Sized> RevocationStore for BoundedStore<S> {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), DomainError> {
        self.bounded("set_with_expiry", self.inner.set_with_expiry(key, value, ttl_seconds))
            .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        self.bounded("scan", self.inner.scan(cursor, pattern, count)).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.bounded("ping", self.inner.ping()).await
    }
}
