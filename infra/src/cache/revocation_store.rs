//! Redis-backed revocation store

use async_trait::async_trait;

use atlas_core::errors::DomainError;
use atlas_core::repositories::RevocationStore;
use atlas_shared::config::CacheConfig;

use super::redis_client::RedisClient;

/// Revocation store on top of [`RedisClient`]
///
/// Keys are namespaced with the configured prefix; scan results are returned
/// without it.
#[derive(Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
    config: CacheConfig,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient, config: CacheConfig) -> Self {
        Self { client, config }
    }

    /// Connect and build the store in one step
    pub async fn connect(config: CacheConfig) -> Result<Self, crate::InfrastructureError> {
        let client = RedisClient::new(&config).await?;
        Ok(Self::new(client, config))
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn strip_prefix(&self, key: String) -> String {
        match &self.config.key_prefix {
            Some(prefix) => key
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(str::to_string)
                .unwrap_or(key),
            None => key,
        }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64)
        -> Result<(), DomainError> {
        Ok(self
            .client
            .set_with_expiry(&self.config.make_key(key), value, ttl_seconds.max(1))
            .await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.client.get(&self.config.make_key(key)).await?)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.client.exists(&self.config.make_key(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.client.delete(&self.config.make_key(key)).await?)
    }

    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        let (next, keys) = self
            .client
            .scan(cursor, &self.config.make_key(pattern), count)
            .await?;
        Ok((next, keys.into_iter().map(|k| self.strip_prefix(k)).collect()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        if self.client.health_check().await? {
            Ok(())
        } else {
            Err(DomainError::store_unavailable("unexpected PING reply"))
        }
    }
}
