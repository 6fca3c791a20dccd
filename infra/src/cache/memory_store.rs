//! In-process revocation store for development and tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use atlas_core::errors::DomainError;
use atlas_core::repositories::revocation::{matches_pattern, RevocationStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
    /// Insertion order; scan cursors point into this sequence
    seq: u64,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

/// Single-process store with TTL semantics matching Redis
///
/// Expired entries are dropped lazily on access and during scans. State is not
/// shared between processes, so this is only suitable for one instance.
#[derive(Clone, Default)]
pub struct MemoryRevocationStore {
    state: Arc<RwLock<State>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.state
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.next_seq += 1;
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds.max(1)),
            seq: state.next_seq,
        };
        state.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        match state.entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let now = Instant::now();
        let removed = self.state.write().await.entries.remove(key);
        Ok(removed.is_some_and(|entry| entry.is_live(now)))
    }

    /// Pages through keys in insertion order
    ///
    /// The cursor is one past the sequence number of the last key returned, so
    /// deleting keys between pages never shifts later keys out of view. A key
    /// rewritten mid-scan may be reported twice.
    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        state.entries.retain(|_, entry| entry.is_live(now));

        let mut matching: Vec<(u64, &String)> = state
            .entries
            .iter()
            .filter(|(key, entry)| entry.seq >= cursor && matches_pattern(pattern, key))
            .map(|(key, entry)| (entry.seq, key))
            .collect();
        matching.sort_unstable_by_key(|(seq, _)| *seq);

        let count = count.max(1);
        let page: Vec<String> = matching.iter().take(count).map(|(_, k)| (*k).clone()).collect();
        let next = match matching.get(count.saturating_sub(1)) {
            Some((seq, _)) if matching.len() > count => seq + 1,
            _ => 0,
        };

        Ok((next, page))
    }
}
