//! Revocation store trait: the key/expiry store behind refresh tracking and the blacklist.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Key/expiry store holding active refresh ids and blacklisted token ids
///
/// Every call is a remote round trip that can fail. Implementations report
/// failures as `DomainError::StoreUnavailable`.
///
/// # Concurrency
/// `delete` must be atomic and report whether this call removed the key.
/// Refresh redemption relies on it so that only one of several concurrent
/// redeemers of the same token wins.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl_seconds`
    ///
    /// # Arguments
    /// * `key` - Full key, e.g. `refresh:<jti>`
    /// * `value` - Value to store
    /// * `ttl_seconds` - Lifetime of the entry; callers never pass zero
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), DomainError>;

    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Check whether `key` is present and unexpired
    async fn exists(&self, key: &str) -> Result<bool, DomainError>;

    /// Remove `key`
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the key
    /// * `Ok(false)` - The key was already absent
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// One page of a cursor scan over keys matching a `prefix*` glob
    ///
    /// Start with cursor 0; the scan is complete when the returned cursor is 0.
    /// Pages may repeat keys and may be empty before the end.
    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError>;

    /// Round trip to the backend without touching any key
    ///
    /// Stores without a remote backend are always reachable.
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Match `key` against a glob that may end in a single `*`
pub fn matches_pattern(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}
