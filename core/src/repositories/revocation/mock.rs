//! Mock implementation of RevocationStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::errors::DomainError;

use super::r#trait::{matches_pattern, RevocationStore};

/// In-process store with switches to simulate an unreachable or stalled backend
#[derive(Clone, Default)]
pub struct MockRevocationStore {
    /// key -> (value, expiry, insertion sequence)
    entries: Arc<RwLock<HashMap<String, (String, Instant, u64)>>>,
    next_seq: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
    stalled: Arc<AtomicBool>,
}

impl MockRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every subsequent call hang forever
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    /// Remaining TTL of `key` in whole seconds, if present
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(_, expires_at, _)| *expires_at > Instant::now())
            .map(|(_, expires_at, _)| expires_at.saturating_duration_since(Instant::now()).as_secs())
    }

    async fn check(&self) -> Result<(), DomainError> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::store_unavailable("mock store is down"));
        }
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for MockRevocationStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), DomainError> {
        self.check().await?;
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (value.to_string(), expires_at, seq));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check().await?;
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at, _)| *expires_at > Instant::now())
            .map(|(value, _, _)| value.clone()))
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.check().await?;
        let mut entries = self.entries.write().await;
        Ok(matches!(
            entries.remove(key),
            Some((_, expires_at, _)) if expires_at > Instant::now()
        ))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.check().await
    }

    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        self.check().await?;
        let entries = self.entries.read().await;
        let now = Instant::now();
        let mut keys: Vec<(u64, &String)> = entries
            .iter()
            .filter(|(key, (_, expires_at, seq))| {
                *seq >= cursor && *expires_at > now && matches_pattern(pattern, key)
            })
            .map(|(key, (_, _, seq))| (*seq, key))
            .collect();
        keys.sort_unstable_by_key(|(seq, _)| *seq);

        // Cursor resumes after the last returned sequence, like Redis SCAN it
        // survives deletions between pages.
        let count = count.max(1);
        let page = keys.iter().take(count).map(|(_, k)| (*k).clone()).collect();
        let next = if keys.len() > count { keys[count - 1].0 + 1 } else { 0 };
        Ok((next, page))
    }
}
